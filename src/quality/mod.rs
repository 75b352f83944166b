// Retrieval-quality classification. The policy is an ordered rule list
// evaluated top to bottom over features of the best hit; the first rule
// that fires decides the label, which keeps each rule independently
// testable.


use serde::Serialize;
use tracing::debug;

use crate::config::QualityConfig;
use crate::retrieval::SearchResult;
use crate::tokenizer::term_set;

/// Cap for the boosted high-confidence value.
const HIGH_CONFIDENCE_CAP: f32 = 0.95;
const HIGH_CONFIDENCE_BOOST: f32 = 0.2;
/// Confidence assigned to actionable questions the document cannot answer.
const UNANSWERABLE_CONFIDENCE: f32 = 0.1;

const SENTENCE_ENDINGS: &[char] = &['.', '!', '?', '。', '！', '？'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    High,
    Medium,
    Low,
}

impl QualityLabel {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Derived per query; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityAssessment {
    pub label: QualityLabel,
    pub confidence: f32,
    pub reason: String,
}

/// Features of the best hit that the classification rules read.
struct Features {
    similarity: f32,
    overlap: f32,
    complete: bool,
    unanswerable_actionable: bool,
}

struct Rule {
    name: &'static str,
    eval: fn(&Features, &QualityConfig) -> Option<(QualityLabel, f32)>,
}

/// Evaluated top to bottom; the first `Some` wins.
static RULES: &[Rule] = &[
    Rule {
        name: "strong-match",
        eval: |f, c| {
            (f.similarity >= c.high_similarity && f.overlap >= c.high_overlap && f.complete).then(
                || {
                    (
                        QualityLabel::High,
                        (f.similarity + HIGH_CONFIDENCE_BOOST).min(HIGH_CONFIDENCE_CAP),
                    )
                },
            )
        },
    },
    Rule {
        name: "partial-match",
        eval: |f, c| {
            (f.similarity >= c.medium_similarity && f.overlap >= c.medium_overlap)
                .then(|| (QualityLabel::Medium, f.similarity.clamp(0.0, 1.0)))
        },
    },
    Rule {
        name: "unanswerable-actionable",
        eval: |f, _| {
            f.unanswerable_actionable
                .then_some((QualityLabel::Low, UNANSWERABLE_CONFIDENCE))
        },
    },
    Rule {
        name: "weak-similarity",
        eval: |f, c| {
            (f.similarity < c.low_similarity)
                .then(|| (QualityLabel::Low, f.similarity.clamp(0.0, 1.0)))
        },
    },
    Rule {
        name: "default-medium",
        eval: |f, _| Some((QualityLabel::Medium, f.similarity.clamp(0.0, 1.0))),
    },
];

/// Classify how trustworthy a result set is for direct use.
#[inline]
pub fn evaluate(query: &str, results: &[SearchResult], config: &QualityConfig) -> QualityAssessment {
    let Some(best) = results.first() else {
        return QualityAssessment {
            label: QualityLabel::Low,
            confidence: 0.0,
            reason: "no results".to_string(),
        };
    };

    let features = Features {
        similarity: best.similarity,
        overlap: term_overlap(query, &best.chunk.text),
        complete: is_complete_passage(&best.chunk.text, config),
        unanswerable_actionable: is_unanswerable_actionable(query, &best.chunk.text, config),
    };

    for rule in RULES {
        if let Some((label, confidence)) = (rule.eval)(&features, config) {
            debug!(
                "Quality rule '{}' fired: label={} confidence={:.2}",
                rule.name,
                label.as_str(),
                confidence
            );
            return QualityAssessment {
                label,
                confidence,
                reason: rule.name.to_string(),
            };
        }
    }

    // The last rule always fires; this is unreachable in practice.
    QualityAssessment {
        label: QualityLabel::Low,
        confidence: 0.0,
        reason: "no rule fired".to_string(),
    }
}

/// Fraction of the query's terms present in the chunk's term set.
fn term_overlap(query: &str, chunk_text: &str) -> f32 {
    let query_terms = term_set(query);
    if query_terms.is_empty() {
        return 0.0;
    }
    let chunk_terms = term_set(chunk_text);
    let shared = query_terms.intersection(&chunk_terms).count();
    shared as f32 / query_terms.len() as f32
}

/// A passage long enough to stand alone and closed by sentence punctuation.
fn is_complete_passage(text: &str, config: &QualityConfig) -> bool {
    text.chars().count() > config.complete_min_chars
        && text.chars().any(|c| SENTENCE_ENDINGS.contains(&c))
}

/// How-to questions deserve an explicit low-confidence signal when the best
/// chunk carries none of the expected procedural vocabulary.
fn is_unanswerable_actionable(query: &str, chunk_text: &str, config: &QualityConfig) -> bool {
    let query_lower = query.to_lowercase();
    if !config
        .actionable_markers
        .iter()
        .any(|marker| query_lower.contains(marker.as_str()))
    {
        return false;
    }

    let text_lower = chunk_text.to_lowercase();
    !config
        .domain_hint_terms
        .iter()
        .any(|term| text_lower.contains(term.as_str()))
}
