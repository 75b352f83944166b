// Similarity search over one document session: cosine score over the
// session's TF-IDF index plus a keyword bonus for lexical signals the
// vector space is too coarse to see, with a bounded FIFO result cache.

pub mod cache;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::DocQaError;
use crate::config::RetrievalConfig;
use crate::index::cosine_similarity;
use crate::segmenter::Chunk;
use crate::session::DocumentSession;
use crate::tokenizer::tokenize;
use cache::FifoCache;

/// Bonus for the chunk containing the whole query as a substring.
const CONTAINMENT_BONUS: f32 = 0.5;
/// Bonus when a why-class interrogative appears in both query and chunk.
const WHY_BONUS: f32 = 0.8;
/// Ceiling for the matched-term-fraction bonus.
const TERM_FRACTION_BONUS: f32 = 0.3;
/// Bonus for a short, probably-title chunk containing a matched term.
const TITLE_HINT_BONUS: f32 = 0.2;
const TITLE_HINT_MAX_CHARS: usize = 100;
/// Query terms shorter than this are skipped by the fraction bonus.
const MIN_TERM_CHARS: usize = 2;

static PAGE_LOCATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(on which page|which page|what page|第几页|在哪一页|哪一页|哪页)")
        .expect("page locator pattern is static and valid")
});

static WHY_MARKERS: &[&str] = &["为什么", "为何", "why", "how come"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceLabel {
    High,
    Medium,
    Low,
    Possible,
}

impl RelevanceLabel {
    #[inline]
    pub fn for_score(score: f32, config: &RetrievalConfig) -> Self {
        if score > config.high_relevance {
            Self::High
        } else if score > config.medium_relevance {
            Self::Medium
        } else if score > config.low_relevance {
            Self::Low
        } else {
            Self::Possible
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Possible => "possible",
        }
    }
}

/// One ranked hit; ephemeral, produced per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub similarity: f32,
    pub relevance: RelevanceLabel,
}

type CacheKey = (String, String, usize);

pub struct RetrievalEngine {
    config: RetrievalConfig,
    cache: FifoCache<CacheKey, Vec<SearchResult>>,
}

impl RetrievalEngine {
    #[inline]
    pub fn new(config: RetrievalConfig) -> Self {
        let cache = FifoCache::new(config.cache_capacity);
        Self { config, cache }
    }

    /// Rank the session's chunks against a query and return the top `top_k`
    /// results, best first. Results are cached per
    /// `(document, normalized query, top_k)` and a hit is returned unchanged
    /// without re-scoring.
    #[inline]
    pub fn search(
        &mut self,
        session: &DocumentSession,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let normalized = query.trim().to_lowercase();
        let key = (session.document_id.clone(), normalized.clone(), top_k);

        if let Some(hit) = self.cache.get(&key) {
            debug!(
                "Cache hit for query '{}' on document {}",
                normalized, session.document_id
            );
            return Ok(hit.clone());
        }

        let results = self.score(session, &normalized, top_k)?;
        self.cache.insert(key, results.clone());
        Ok(results)
    }

    /// Drop cached results for one document (used when a session is removed).
    #[inline]
    pub fn invalidate_document(&mut self, document_id: &str) {
        self.cache.retain(|(document, _, _)| document != document_id);
    }

    #[inline]
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    fn score(
        &self,
        session: &DocumentSession,
        normalized_query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        if session.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = session.index.vectorize_query(normalized_query);
        let mut scored: Vec<(f32, &Chunk)> = Vec::with_capacity(session.chunks.len());

        for chunk in &session.chunks {
            let vector = session.index.chunk_vector(&chunk.id).ok_or_else(|| {
                anyhow::anyhow!(
                    "chunk {} of document {} has no vector; index out of sync",
                    chunk.id,
                    session.document_id
                )
            })?;
            if vector.len() != query_vector.len() {
                return Err(DocQaError::DimensionMismatch {
                    query: query_vector.len(),
                    index: vector.len(),
                }
                .into());
            }

            let score = cosine_similarity(&query_vector, vector)
                + keyword_bonus(normalized_query, &chunk.text);
            scored.push((score, chunk));
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(
            "Scored query '{}' against {} chunks of document {}, returning {}",
            normalized_query,
            session.chunks.len(),
            session.document_id,
            scored.len()
        );

        Ok(scored
            .into_iter()
            .map(|(score, chunk)| SearchResult {
                chunk: chunk.clone(),
                similarity: score,
                relevance: RelevanceLabel::for_score(score, &self.config),
            })
            .collect())
    }
}

/// Lexical reward on top of cosine similarity. All comparisons run on
/// lowercased text; the query is expected pre-normalized.
fn keyword_bonus(normalized_query: &str, chunk_text: &str) -> f32 {
    let text = chunk_text.to_lowercase();
    let mut bonus = 0.0;

    // Whole-query containment, ignoring page-locator phrasing the user
    // tacked on ("which page talks about X").
    let stripped = PAGE_LOCATOR_PATTERN
        .replace_all(normalized_query, "")
        .trim()
        .to_string();
    if !stripped.is_empty() && text.contains(&stripped) {
        bonus += CONTAINMENT_BONUS;
    }

    if WHY_MARKERS
        .iter()
        .any(|marker| normalized_query.contains(marker) && text.contains(marker))
    {
        bonus += WHY_BONUS;
    }

    let terms = tokenize(normalized_query);
    let matched_any = terms.iter().any(|term| text.contains(term.as_str()));

    let eligible: Vec<&String> = terms
        .iter()
        .filter(|term| term.chars().count() >= MIN_TERM_CHARS)
        .collect();
    if !eligible.is_empty() {
        let matched = eligible
            .iter()
            .filter(|term| text.contains(term.as_str()))
            .count();
        bonus += matched as f32 / eligible.len() as f32 * TERM_FRACTION_BONUS;
    }

    if chunk_text.chars().count() < TITLE_HINT_MAX_CHARS && matched_any {
        bonus += TITLE_HINT_BONUS;
    }

    bonus
}
