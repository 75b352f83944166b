// The engine facade: one instance holds every ingested document session
// and answers questions against an explicitly named document. There is no
// implicit "current document" in the scoring path; `switch_document` only
// records a default id for hosts that want one.


use anyhow::Result;
use tracing::{debug, info};

use crate::DocQaError;
use crate::answer::{AnswerMode, AnswerOrchestrator};
use crate::completion::CompletionClient;
use crate::config::EngineConfig;
use crate::locale::Locale;
use crate::quality::{QualityAssessment, evaluate};
use crate::retrieval::{RetrievalEngine, SearchResult};
use crate::session::{ConversationTurn, SessionStore};

pub struct DocQaEngine {
    config: EngineConfig,
    store: SessionStore,
    retrieval: RetrievalEngine,
    orchestrator: AnswerOrchestrator,
    default_document: Option<String>,
}

impl DocQaEngine {
    #[inline]
    pub fn new(config: EngineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| DocQaError::Config(e.to_string()))?;

        let client = CompletionClient::new(&config.completion)?;
        let retrieval = RetrievalEngine::new(config.retrieval.clone());
        let orchestrator = AnswerOrchestrator::new(config.answer.clone(), client);

        Ok(Self {
            config,
            store: SessionStore::new(),
            retrieval,
            orchestrator,
            default_document: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Segment a document's pages and index the result. Idempotent per
    /// document id; returns the session's chunk count.
    #[inline]
    pub fn ingest(&mut self, document_id: &str, title: &str, page_texts: &[String]) -> usize {
        self.store
            .ingest(document_id, title, page_texts, &self.config.segmenter)
    }

    /// Record `document_id` as the default for `ask_default`. Returns false
    /// if the document is unknown.
    #[inline]
    pub fn switch_document(&mut self, document_id: &str) -> bool {
        if self.store.contains(document_id) {
            debug!("Default document switched to {}", document_id);
            self.default_document = Some(document_id.to_string());
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn default_document(&self) -> Option<&str> {
        self.default_document.as_deref()
    }

    /// Rank a document's chunks against a query. Unknown document ids are a
    /// caller bug and fail fast.
    #[inline]
    pub fn search(
        &mut self,
        document_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let session = self
            .store
            .get(document_id)
            .ok_or_else(|| DocQaError::UnknownDocument(document_id.to_string()))?;
        self.retrieval.search(session, query, top_k)
    }

    /// Answer a question about a document. Always produces answer text when
    /// the document exists: retrieval quality selects the strategy, and a
    /// completion-service failure degrades to a canned locale fallback.
    #[inline]
    pub async fn ask(
        &mut self,
        document_id: &str,
        question: &str,
        locale: Locale,
        mode: AnswerMode,
    ) -> Result<String> {
        let results = {
            let session = self
                .store
                .get(document_id)
                .ok_or_else(|| DocQaError::UnknownDocument(document_id.to_string()))?;
            self.retrieval
                .search(session, question, self.config.retrieval.default_top_k)?
        };

        let assessment = evaluate(question, &results, &self.config.quality);
        info!(
            "Question on document {}: {} results, quality={} ({})",
            document_id,
            results.len(),
            assessment.label.as_str(),
            assessment.reason
        );

        let session = self
            .store
            .get_mut(document_id)
            .ok_or_else(|| DocQaError::UnknownDocument(document_id.to_string()))?;
        let answer = self
            .orchestrator
            .answer(session, question, &results, &assessment, locale, mode)
            .await;

        Ok(answer)
    }

    /// `ask` against the document recorded by `switch_document`.
    #[inline]
    pub async fn ask_default(
        &mut self,
        question: &str,
        locale: Locale,
        mode: AnswerMode,
    ) -> Result<String> {
        let document_id = self
            .default_document
            .clone()
            .ok_or_else(|| DocQaError::UnknownDocument("<no default document>".to_string()))?;
        self.ask(&document_id, question, locale, mode).await
    }

    /// Classify retrieval quality for a query without generating an answer.
    #[inline]
    pub fn assess(&mut self, document_id: &str, query: &str) -> Result<QualityAssessment> {
        let results = self.search(document_id, query, self.config.retrieval.default_top_k)?;
        Ok(evaluate(query, &results, &self.config.quality))
    }

    #[inline]
    pub fn history(&self, document_id: &str) -> Option<&[ConversationTurn]> {
        self.store.get(document_id).map(|s| s.history())
    }

    #[inline]
    pub fn clear_history(&mut self, document_id: &str) -> bool {
        match self.store.get_mut(document_id) {
            Some(session) => {
                session.clear_history();
                true
            }
            None => false,
        }
    }

    /// Drop a document session and its cached results. Returns false for
    /// unknown ids.
    #[inline]
    pub fn remove_document(&mut self, document_id: &str) -> bool {
        if !self.store.remove(document_id) {
            return false;
        }
        self.retrieval.invalidate_document(document_id);
        if self.default_document.as_deref() == Some(document_id) {
            self.default_document = None;
        }
        true
    }

    #[inline]
    pub fn contains_document(&self, document_id: &str) -> bool {
        self.store.contains(document_id)
    }

    #[inline]
    pub fn document_ids(&self) -> Vec<String> {
        self.store.document_ids()
    }
}
