// Answer generation. Quality class picks one of three strategies, the
// locale picks the instruction templates, and any completion failure is
// converted into a canned answer so the host always gets text back.


use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::completion::{CompletionClient, CompletionRequest};
use crate::config::AnswerConfig;
use crate::locale::{Locale, templates};
use crate::quality::{QualityAssessment, QualityLabel};
use crate::retrieval::SearchResult;
use crate::session::DocumentSession;

const CITATION_INSTRUCTION: &str = "Cite the page number for every fact taken from the excerpts \
                                    using full-width brackets, for example 【3】.";
const DIRECT_INSTRUCTION: &str = "Answer strictly from the document excerpts below. Do not add \
                                  outside knowledge. If the excerpts do not contain the answer, \
                                  say that the document does not cover it.";
const HYBRID_INSTRUCTION: &str = "Prefer the document excerpts below. Where they are \
                                  insufficient you may supplement with general knowledge, but \
                                  keep document facts and general knowledge distinguishable.";

/// Generation mode requested by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Fast,
    #[default]
    High,
}

impl AnswerMode {
    #[inline]
    pub fn parse(mode: &str) -> Self {
        if mode.trim().eq_ignore_ascii_case("fast") {
            Self::Fast
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Hybrid,
    Fallback,
}

impl Strategy {
    #[inline]
    pub fn for_quality(label: QualityLabel) -> Self {
        match label {
            QualityLabel::High => Self::Direct,
            QualityLabel::Medium => Self::Hybrid,
            QualityLabel::Low => Self::Fallback,
        }
    }
}

/// Format a page citation the way prompts instruct the model to.
#[inline]
pub fn format_page_citation(page_number: u32) -> String {
    format!("【{page_number}】")
}

pub struct AnswerOrchestrator {
    config: AnswerConfig,
    client: CompletionClient,
}

impl AnswerOrchestrator {
    #[inline]
    pub fn new(config: AnswerConfig, client: CompletionClient) -> Self {
        Self { config, client }
    }

    /// Generate an answer for `question`, record the exchange in the
    /// session history, and return the answer text. Never fails: a
    /// completion-service failure yields a canned locale fallback instead.
    #[inline]
    pub async fn answer(
        &self,
        session: &mut DocumentSession,
        question: &str,
        results: &[SearchResult],
        assessment: &QualityAssessment,
        locale: Locale,
        mode: AnswerMode,
    ) -> String {
        let strategy = Strategy::for_quality(assessment.label);
        debug!(
            "Answering with {:?} strategy (quality={}, confidence={:.2}, locale={})",
            strategy,
            assessment.label.as_str(),
            assessment.confidence,
            locale.as_str()
        );

        let request = build_request(question, results, strategy, locale, mode);
        let answer = match self.client.complete(&request).await {
            Ok(content) => content,
            Err(error) => {
                warn!("Completion failed, returning canned fallback: {:#}", error);
                canned_fallback(locale)
            }
        };

        session.record_exchange(question, &answer, self.config.history_limit);
        answer
    }
}

fn build_request(
    question: &str,
    results: &[SearchResult],
    strategy: Strategy,
    locale: Locale,
    mode: AnswerMode,
) -> CompletionRequest {
    let t = templates(locale);
    let preamble = match mode {
        AnswerMode::Fast => t.preamble_concise,
        AnswerMode::High => t.preamble_normal,
    };
    let system_prompt = format!("{}\n\n{}", t.language_instruction, preamble);

    let user_prompt = match strategy {
        Strategy::Direct => format!(
            "{DIRECT_INSTRUCTION}\n{CITATION_INSTRUCTION}\n\nDocument excerpts:\n{}\nQuestion: {question}",
            format_excerpts(results)
        ),
        Strategy::Hybrid => format!(
            "{HYBRID_INSTRUCTION}\n{CITATION_INSTRUCTION}\n\nDocument excerpts:\n{}\nQuestion: {question}",
            format_excerpts(results)
        ),
        Strategy::Fallback => format!(
            "Nothing sufficiently relevant was found in the document. Answer the question from \
             general knowledge, and begin your answer with this exact sentence: \"{}\"\n\n\
             Question: {question}",
            t.nothing_found_disclosure
        ),
    };

    CompletionRequest {
        system_prompt,
        user_prompt,
    }
}

fn format_excerpts(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "[Page {} {}] {}",
                result.chunk.page_number,
                format_page_citation(result.chunk.page_number),
                result.chunk.text
            )
        })
        .join("\n")
}

fn canned_fallback(locale: Locale) -> String {
    let lines = templates(locale).fallback_lines;
    lines
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(lines[0])
        .to_string()
}
