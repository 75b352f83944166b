use super::*;
use crate::config::SegmenterConfig;
use crate::segmenter::segment_page;

fn session_from_pages(document_id: &str, pages: &[&str]) -> DocumentSession {
    let config = SegmenterConfig::default();
    let mut chunks = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        chunks.extend(segment_page(document_id, i as u32 + 1, page, &config));
    }
    DocumentSession::new(document_id.to_string(), "Test".to_string(), chunks)
}

fn engine() -> RetrievalEngine {
    RetrievalEngine::new(RetrievalConfig::default())
}

#[test]
fn returns_at_most_top_k_sorted_descending() {
    let session = session_from_pages(
        "doc-1",
        &[
            "git push uploads commits to the remote repository\n\n\
             git pull downloads commits from the remote\n\n\
             merge conflicts happen when branches diverge\n\n\
             rebase rewrites commit history linearly",
        ],
    );
    let mut engine = engine();

    let results = engine
        .search(&session, "push commits to the remote", 3)
        .expect("search should succeed");

    assert!(results.len() <= 3);
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    assert!(results[0].chunk.text.contains("push"));
}

#[test]
fn top_k_zero_returns_nothing() {
    let session = session_from_pages("doc-1", &["some paragraph with enough text"]);
    let mut engine = engine();

    let results = engine
        .search(&session, "paragraph", 0)
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[test]
fn empty_session_returns_empty_results() {
    let session = DocumentSession::new("doc-1".to_string(), "Empty".to_string(), vec![]);
    let mut engine = engine();

    let results = engine
        .search(&session, "anything at all", 5)
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[test]
fn repeated_query_hits_the_cache() {
    let session = session_from_pages("doc-1", &["git push uploads commits to the remote"]);
    let mut engine = engine();

    let first = engine
        .search(&session, "  Push Commits  ", 5)
        .expect("search should succeed");
    let second = engine
        .search(&session, "  Push Commits  ", 5)
        .expect("search should succeed");

    assert_eq!(first, second);
    assert_eq!(engine.cached_queries(), 1);
}

#[test]
fn different_top_k_is_a_different_cache_entry() {
    let session = session_from_pages("doc-1", &["git push uploads commits to the remote"]);
    let mut engine = engine();

    engine
        .search(&session, "push", 1)
        .expect("search should succeed");
    engine
        .search(&session, "push", 5)
        .expect("search should succeed");

    assert_eq!(engine.cached_queries(), 2);
}

#[test]
fn cache_evicts_earliest_inserted_query_first() {
    let session = session_from_pages("doc-1", &["git push uploads commits to the remote"]);
    let mut engine = RetrievalEngine::new(RetrievalConfig {
        cache_capacity: 2,
        ..RetrievalConfig::default()
    });

    engine.search(&session, "first", 5).expect("should succeed");
    engine.search(&session, "second", 5).expect("should succeed");
    engine.search(&session, "third", 5).expect("should succeed");

    assert_eq!(engine.cached_queries(), 2);
}

#[test]
fn invalidate_document_drops_only_that_documents_entries() {
    let session_a = session_from_pages("doc-a", &["alpha content paragraph here"]);
    let session_b = session_from_pages("doc-b", &["beta content paragraph here"]);
    let mut engine = engine();

    engine.search(&session_a, "alpha", 5).expect("should succeed");
    engine.search(&session_b, "beta", 5).expect("should succeed");
    assert_eq!(engine.cached_queries(), 2);

    engine.invalidate_document("doc-a");
    assert_eq!(engine.cached_queries(), 1);
}

#[test]
fn whole_query_containment_outranks_scattered_terms() {
    let session = session_from_pages(
        "doc-1",
        &[
            "remote tracking branches record the state of branches\n\n\
             to sync changes run git push to the remote repository",
        ],
    );
    let mut engine = engine();

    let results = engine
        .search(&session, "git push", 2)
        .expect("search should succeed");

    assert!(results[0].chunk.text.contains("git push"));
}

#[test]
fn why_interrogative_in_query_and_chunk_is_rewarded() {
    let session = session_from_pages(
        "doc-1",
        &[
            "commits record snapshots of the project\n\n\
             why use branches: branches isolate unfinished work",
        ],
    );
    let mut engine = engine();

    let results = engine
        .search(&session, "why use branches", 2)
        .expect("search should succeed");

    assert!(results[0].chunk.text.starts_with("why use branches"));
    assert_eq!(results[0].relevance, RelevanceLabel::High);
}

#[test]
fn cjk_query_reaches_medium_on_single_chunk_document() {
    let session = session_from_pages("doc-1", &["=== 第1页 ===\nGit push 用于将本地更改同步到远程仓库。"]);
    let mut engine = engine();

    let results = engine
        .search(&session, "怎么同步到远程", 3)
        .expect("search should succeed");

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0].relevance,
        RelevanceLabel::High | RelevanceLabel::Medium
    ));
}

#[test]
fn page_locator_phrasing_is_stripped_before_containment() {
    let session = session_from_pages(
        "doc-1",
        &[
            "installing dependencies requires a package manager\n\n\
             release notes are published every month",
        ],
    );
    let mut engine = engine();

    let plain = engine
        .search(&session, "release notes", 2)
        .expect("search should succeed");
    let located = engine
        .search(&session, "which page release notes", 2)
        .expect("search should succeed");

    assert_eq!(plain[0].chunk.text, located[0].chunk.text);
    // Containment still fires once the locator phrasing is removed.
    assert!(located[0].similarity > 0.5);
}

#[test]
fn stale_index_dimensionality_fails_fast() {
    let mut session = session_from_pages("doc-1", &["original paragraph with enough words"]);
    // Simulate an index rebuilt from a different chunk set: vectors no
    // longer match the session's chunk ids/dimensions.
    let other = session_from_pages("doc-1", &["entirely different wording over here"]);
    session.index = other.index;

    let mut engine = engine();
    let err = engine
        .search(&session, "original paragraph", 3)
        .expect_err("mismatched index must raise");
    assert!(err.to_string().contains("index out of sync") || err.to_string().contains("mismatch"));
}

#[test]
fn relevance_labels_follow_thresholds() {
    let config = RetrievalConfig::default();
    assert_eq!(
        RelevanceLabel::for_score(0.9, &config),
        RelevanceLabel::High
    );
    assert_eq!(
        RelevanceLabel::for_score(0.5, &config),
        RelevanceLabel::Medium
    );
    assert_eq!(RelevanceLabel::for_score(0.3, &config), RelevanceLabel::Low);
    assert_eq!(
        RelevanceLabel::for_score(0.1, &config),
        RelevanceLabel::Possible
    );
    assert_eq!(
        RelevanceLabel::for_score(0.2, &config),
        RelevanceLabel::Possible
    );
}
