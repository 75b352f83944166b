// Per-document session state: the chunk list, its vector index, and the
// bounded conversation history. Sessions are replaced wholesale on
// (re)ingestion, never patched field by field, so a reader always sees a
// consistent chunk/index pair.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SegmenterConfig;
use crate::index::VectorIndex;
use crate::segmenter::{Chunk, segment_page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct DocumentSession {
    pub document_id: String,
    pub title: String,
    pub chunks: Vec<Chunk>,
    pub index: VectorIndex,
    history: Vec<ConversationTurn>,
}

impl DocumentSession {
    #[inline]
    pub fn new(document_id: String, title: String, chunks: Vec<Chunk>) -> Self {
        let index = VectorIndex::build(&chunks);
        Self {
            document_id,
            title,
            chunks,
            index,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Record one question/answer exchange, then trim the window to the
    /// most recent `limit` turns.
    #[inline]
    pub fn record_exchange(&mut self, question: &str, answer: &str, limit: usize) {
        self.history.push(ConversationTurn {
            role: Role::User,
            content: question.to_string(),
        });
        self.history.push(ConversationTurn {
            role: Role::Assistant,
            content: answer.to_string(),
        });
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    #[inline]
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// In-memory store of document sessions, keyed by document id. Process
/// lifetime only; nothing is persisted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, DocumentSession>,
}

impl SessionStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment every page and build one vector index over the combined
    /// chunk list. Re-ingesting a known document id is a no-op that reuses
    /// the stored session. Returns the session's chunk count.
    #[inline]
    pub fn ingest(
        &mut self,
        document_id: &str,
        title: &str,
        page_texts: &[String],
        config: &SegmenterConfig,
    ) -> usize {
        if let Some(existing) = self.sessions.get(document_id) {
            debug!("Document {} already ingested, reusing session", document_id);
            return existing.chunks.len();
        }

        let mut chunks = Vec::new();
        for (page_index, page_text) in page_texts.iter().enumerate() {
            let page_number = page_index as u32 + 1;
            chunks.extend(segment_page(document_id, page_number, page_text, config));
        }

        let session = DocumentSession::new(document_id.to_string(), title.to_string(), chunks);
        info!(
            "Ingested document {} ('{}'): {} pages, {} chunks, {} terms",
            document_id,
            title,
            page_texts.len(),
            session.chunks.len(),
            session.index.dimension()
        );

        let count = session.chunks.len();
        self.sessions.insert(document_id.to_string(), session);
        count
    }

    #[inline]
    pub fn get(&self, document_id: &str) -> Option<&DocumentSession> {
        self.sessions.get(document_id)
    }

    #[inline]
    pub fn get_mut(&mut self, document_id: &str) -> Option<&mut DocumentSession> {
        self.sessions.get_mut(document_id)
    }

    #[inline]
    pub fn contains(&self, document_id: &str) -> bool {
        self.sessions.contains_key(document_id)
    }

    /// Drop a session; returns false if the id was unknown.
    #[inline]
    pub fn remove(&mut self, document_id: &str) -> bool {
        self.sessions.remove(document_id).is_some()
    }

    #[inline]
    pub fn document_ids(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
