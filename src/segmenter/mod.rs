// Page segmentation: raw page text in, paragraph-sized chunks out. Layout
// is not reproduced (rendering is the host's problem), so positions are
// synthetic reading-order offsets.


use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::SegmenterConfig;

/// Width assigned to synthetic chunk positions (A4 points).
const SYNTHETIC_PAGE_WIDTH: f32 = 595.0;
/// Vertical distance between consecutive synthetic chunk positions.
const SYNTHETIC_LINE_OFFSET: f32 = 40.0;
const CONFIDENCE_FLOOR: f32 = 0.1;
const SYMBOL_RATIO_LIMIT: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPosition {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A paragraph-sized unit of extracted document text. Immutable once
/// produced by segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub page_number: u32,
    pub text: String,
    pub position: ChunkPosition,
    pub font_size_estimate: f32,
    pub is_title: bool,
    pub confidence: f32,
}

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Numbered list markers: "3." / "12、" / "3)"
        r"^\d{1,3}[.、．)）]",
        // CJK enumeration markers: "一、" / "三."
        r"^[一二三四五六七八九十百]+[、.．]",
        // Lettered markers: "a)" / "(B." / "（c）"
        r"^[(（]?[A-Za-z][.)）]",
        // Bullet markers
        r"^[•·▪◦]",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("title patterns are static and valid"))
    .collect()
});

struct ConfidenceRule {
    name: &'static str,
    penalty: f32,
    applies: fn(&str) -> bool,
}

/// Ordered penalty rules; every matching rule multiplies the confidence.
static CONFIDENCE_RULES: &[ConfidenceRule] = &[
    ConfidenceRule {
        name: "very-short",
        penalty: 0.3,
        applies: |text| text.chars().count() < 5,
    },
    ConfidenceRule {
        name: "short",
        penalty: 0.5,
        applies: |text| {
            let count = text.chars().count();
            (5..10).contains(&count)
        },
    },
    ConfidenceRule {
        name: "symbol-heavy",
        penalty: 0.7,
        applies: |text| symbol_ratio(text) > SYMBOL_RATIO_LIMIT,
    },
    ConfidenceRule {
        name: "repeated-run",
        penalty: 0.5,
        applies: |text| has_repeated_run(text, 4),
    },
];

/// Segment one page of raw text into chunks. A page that yields nothing
/// after noise filtering contributes no chunks; that is not an error.
#[inline]
pub fn segment_page(
    document_id: &str,
    page_number: u32,
    raw_text: &str,
    config: &SegmenterConfig,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for segment in split_on_blank_lines(raw_text) {
        let text = segment.trim();
        if text.chars().count() < config.min_segment_chars {
            continue;
        }

        let is_title = looks_like_title(text, config);
        let font_size_estimate = if is_title {
            config.title_font_size
        } else {
            config.base_font_size
        };

        let index = chunks.len();
        chunks.push(Chunk {
            id: Uuid::new_v4().to_string(),
            document_id: document_id.to_string(),
            page_number,
            text: text.to_string(),
            position: ChunkPosition {
                x: 0.0,
                y: index as f32 * SYNTHETIC_LINE_OFFSET,
                width: SYNTHETIC_PAGE_WIDTH,
                height: font_size_estimate * 1.4,
            },
            font_size_estimate,
            is_title,
            confidence: score_confidence(text),
        });
    }

    debug!(
        "Segmented page {} of document {} into {} chunks",
        page_number,
        document_id,
        chunks.len()
    );

    chunks
}

fn split_on_blank_lines(raw_text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for line in raw_text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Short segments carrying list/heading markers are treated as probable
/// titles and given a larger estimated font size.
fn looks_like_title(text: &str, config: &SegmenterConfig) -> bool {
    if text.chars().count() >= config.title_max_chars {
        return false;
    }
    if text.ends_with(':') || text.ends_with('：') {
        return true;
    }
    TITLE_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

fn score_confidence(text: &str) -> f32 {
    let confidence = CONFIDENCE_RULES.iter().fold(1.0_f32, |acc, rule| {
        if (rule.applies)(text) {
            debug!("Confidence rule '{}' applied", rule.name);
            acc * rule.penalty
        } else {
            acc
        }
    });
    confidence.max(CONFIDENCE_FLOOR)
}

fn symbol_ratio(text: &str) -> f32 {
    let total = text.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return 0.0;
    }
    let symbols = text
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_alphanumeric())
        .count();
    symbols as f32 / total as f32
}

fn has_repeated_run(text: &str, limit: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut run = 0_usize;

    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= limit {
                return true;
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }

    false
}
