// Configuration for the engine: every tunable threshold used by the
// retrieval pipeline lives here as a named default so hosts can override
// them from TOML without the core carrying hidden literals.


use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_SEGMENT_CHARS: usize = 10;
pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;
pub const DEFAULT_BASE_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_TITLE_FONT_SIZE: f32 = 16.0;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_CACHE_CAPACITY: usize = 64;
pub const DEFAULT_HIGH_RELEVANCE: f32 = 0.7;
pub const DEFAULT_MEDIUM_RELEVANCE: f32 = 0.4;
pub const DEFAULT_LOW_RELEVANCE: f32 = 0.2;

pub const DEFAULT_HIGH_OVERLAP: f32 = 0.6;
pub const DEFAULT_MEDIUM_OVERLAP: f32 = 0.3;
pub const DEFAULT_LOW_SIMILARITY_FLOOR: f32 = 0.3;
pub const DEFAULT_COMPLETE_MIN_CHARS: usize = 50;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_COMPLETION_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub segmenter: SegmenterConfig,
    pub retrieval: RetrievalConfig,
    pub quality: QualityConfig,
    pub answer: AnswerConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Segments shorter than this (after trimming) are dropped as noise.
    pub min_segment_chars: usize,
    /// Segments longer than this are never considered titles.
    pub title_max_chars: usize,
    pub base_font_size: f32,
    pub title_font_size: f32,
}

impl Default for SegmenterConfig {
    #[inline]
    fn default() -> Self {
        Self {
            min_segment_chars: DEFAULT_MIN_SEGMENT_CHARS,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            base_font_size: DEFAULT_BASE_FONT_SIZE,
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of results retrieved by `ask` when the host does not specify.
    pub default_top_k: usize,
    /// Maximum number of cached `(document, query, k)` result lists.
    pub cache_capacity: usize,
    /// Combined-score cutoffs for relevance labels, highest first.
    pub high_relevance: f32,
    pub medium_relevance: f32,
    pub low_relevance: f32,
}

impl Default for RetrievalConfig {
    #[inline]
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            high_relevance: DEFAULT_HIGH_RELEVANCE,
            medium_relevance: DEFAULT_MEDIUM_RELEVANCE,
            low_relevance: DEFAULT_LOW_RELEVANCE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QualityConfig {
    pub high_similarity: f32,
    pub high_overlap: f32,
    pub medium_similarity: f32,
    pub medium_overlap: f32,
    /// Below this similarity a result set is classified low outright.
    pub low_similarity: f32,
    /// Minimum character count for a chunk to count as a complete passage.
    pub complete_min_chars: usize,
    /// Markers identifying actionable/how-to questions.
    pub actionable_markers: Vec<String>,
    /// A chunk answering an actionable question is expected to carry at
    /// least one of these terms.
    pub domain_hint_terms: Vec<String>,
}

impl Default for QualityConfig {
    #[inline]
    fn default() -> Self {
        Self {
            high_similarity: DEFAULT_HIGH_RELEVANCE,
            high_overlap: DEFAULT_HIGH_OVERLAP,
            medium_similarity: DEFAULT_MEDIUM_RELEVANCE,
            medium_overlap: DEFAULT_MEDIUM_OVERLAP,
            low_similarity: DEFAULT_LOW_SIMILARITY_FLOOR,
            complete_min_chars: DEFAULT_COMPLETE_MIN_CHARS,
            actionable_markers: [
                "how to", "how do", "steps", "command", "怎么", "如何", "步骤", "命令",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            domain_hint_terms: ["command", "run", "install", "git", "命令", "执行", "安装"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnswerConfig {
    /// Conversation turns kept per document session (10 turns = 5 exchanges).
    pub history_limit: usize,
}

impl Default for AnswerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    /// Endpoint receiving `{systemPrompt, userPrompt}` POST requests.
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for CompletionConfig {
    #[inline]
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/complete".to_string(),
            timeout_seconds: DEFAULT_COMPLETION_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Invalid relevance thresholds: {0} (must be within 0.0..=1.0 and ordered high > medium > low)"
    )]
    InvalidRelevanceThresholds(String),
    #[error("Invalid quality thresholds: {0} (must be within 0.0..=1.0)")]
    InvalidQualityThresholds(String),
    #[error("Invalid cache capacity: {0} (must be at least 1)")]
    InvalidCacheCapacity(usize),
    #[error("Invalid history limit: {0} (must be at least 2 to hold one exchange)")]
    InvalidHistoryLimit(usize),
    #[error("Invalid minimum segment length: {0} (must be at least 1)")]
    InvalidMinSegmentChars(usize),
    #[error("Invalid completion timeout: {0} (must be between 1 and 300 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid completion endpoint: {0}")]
    InvalidEndpoint(String),
}

impl EngineConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any omitted section.
    #[inline]
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is inside its supported range.
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.retrieval;
        let ordered = r.high_relevance > r.medium_relevance && r.medium_relevance > r.low_relevance;
        let bounded = [r.high_relevance, r.medium_relevance, r.low_relevance]
            .iter()
            .all(|t| (0.0..=1.0).contains(t));
        if !ordered || !bounded {
            return Err(ConfigError::InvalidRelevanceThresholds(format!(
                "high={} medium={} low={}",
                r.high_relevance, r.medium_relevance, r.low_relevance
            )));
        }

        let q = &self.quality;
        let quality_bounded = [
            q.high_similarity,
            q.high_overlap,
            q.medium_similarity,
            q.medium_overlap,
            q.low_similarity,
        ]
        .iter()
        .all(|t| (0.0..=1.0).contains(t));
        if !quality_bounded {
            return Err(ConfigError::InvalidQualityThresholds(format!(
                "high_similarity={} high_overlap={} medium_similarity={} medium_overlap={} low_similarity={}",
                q.high_similarity,
                q.high_overlap,
                q.medium_similarity,
                q.medium_overlap,
                q.low_similarity
            )));
        }

        if self.retrieval.cache_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(
                self.retrieval.cache_capacity,
            ));
        }
        if self.answer.history_limit < 2 {
            return Err(ConfigError::InvalidHistoryLimit(self.answer.history_limit));
        }
        if self.segmenter.min_segment_chars == 0 {
            return Err(ConfigError::InvalidMinSegmentChars(
                self.segmenter.min_segment_chars,
            ));
        }
        if self.completion.timeout_seconds == 0 || self.completion.timeout_seconds > 300 {
            return Err(ConfigError::InvalidTimeout(self.completion.timeout_seconds));
        }
        if url::Url::parse(&self.completion.endpoint).is_err() {
            return Err(ConfigError::InvalidEndpoint(
                self.completion.endpoint.clone(),
            ));
        }

        Ok(())
    }
}
