use super::*;

fn pages(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| (*t).to_string()).collect()
}

#[test]
fn ingest_segments_all_pages() {
    let mut store = SessionStore::new();
    let count = store.ingest(
        "doc-1",
        "Handbook",
        &pages(&[
            "First page paragraph with plenty of text.",
            "Second page paragraph, also long enough.\n\nAnother paragraph on page two.",
        ]),
        &SegmenterConfig::default(),
    );

    assert_eq!(count, 3);
    let session = store.get("doc-1").expect("session should exist");
    assert_eq!(session.title, "Handbook");
    assert_eq!(session.chunks[0].page_number, 1);
    assert_eq!(session.chunks[1].page_number, 2);
    assert_eq!(session.chunks[2].page_number, 2);
}

#[test]
fn every_chunk_has_a_vector() {
    let mut store = SessionStore::new();
    store.ingest(
        "doc-1",
        "Handbook",
        &pages(&["A paragraph about pushing.\n\nA paragraph about pulling."]),
        &SegmenterConfig::default(),
    );

    let session = store.get("doc-1").expect("session should exist");
    for chunk in &session.chunks {
        let vector = session
            .index
            .chunk_vector(&chunk.id)
            .expect("chunk should have a vector");
        assert_eq!(vector.len(), session.index.dimension());
    }
}

#[test]
fn reingestion_is_idempotent() {
    let mut store = SessionStore::new();
    store.ingest(
        "doc-1",
        "Handbook",
        &pages(&["Original content paragraph goes here."]),
        &SegmenterConfig::default(),
    );
    let original_chunk_id = store.get("doc-1").expect("session should exist").chunks[0]
        .id
        .clone();

    // Second ingest with different content must be skipped entirely.
    let count = store.ingest(
        "doc-1",
        "Replacement",
        &pages(&["Completely different replacement text."]),
        &SegmenterConfig::default(),
    );

    assert_eq!(count, 1);
    let session = store.get("doc-1").expect("session should exist");
    assert_eq!(session.title, "Handbook");
    assert_eq!(session.chunks[0].id, original_chunk_id);
}

#[test]
fn empty_document_yields_empty_session() {
    let mut store = SessionStore::new();
    let count = store.ingest("doc-1", "Empty", &[], &SegmenterConfig::default());

    assert_eq!(count, 0);
    let session = store.get("doc-1").expect("session should exist");
    assert!(session.chunks.is_empty());
    assert!(session.index.is_empty());
}

#[test]
fn remove_reports_unknown_ids() {
    let mut store = SessionStore::new();
    store.ingest(
        "doc-1",
        "Handbook",
        &pages(&["A paragraph with enough text."]),
        &SegmenterConfig::default(),
    );

    assert!(store.remove("doc-1"));
    assert!(!store.remove("doc-1"));
    assert!(store.is_empty());
}

#[test]
fn history_window_is_bounded() {
    let mut session = DocumentSession::new("doc-1".to_string(), "Handbook".to_string(), vec![]);

    for i in 0..9 {
        session.record_exchange(&format!("question {i}"), &format!("answer {i}"), 10);
    }

    let history = session.history();
    assert_eq!(history.len(), 10);
    // Oldest surviving turn is the user half of exchange 4.
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "question 4");
    assert_eq!(history[9].role, Role::Assistant);
    assert_eq!(history[9].content, "answer 8");
}

#[test]
fn clear_history_empties_the_window() {
    let mut session = DocumentSession::new("doc-1".to_string(), "Handbook".to_string(), vec![]);
    session.record_exchange("q", "a", 10);
    session.clear_history();

    assert!(session.history().is_empty());
}
