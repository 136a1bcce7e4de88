use lexis_core::{Document, IndexConfig, Posting, SearchIndex, SearchOptions};

fn new_index() -> SearchIndex {
    let config = IndexConfig::default().with_boost("title", 3.0).with_boost("content", 1.0);
    SearchIndex::new(config).unwrap()
}

fn engine_docs() -> Vec<Document> {
    vec![
        Document::new("doc1", "fact").field("title", "Database Engine Design"),
        Document::new("doc2", "fact").field("content", "engine design patterns"),
    ]
}

fn ids(index: &SearchIndex, query: &str, options: &SearchOptions) -> Vec<String> {
    index.search(query, options).results.into_iter().map(|h| h.document.id).collect()
}

/// Every posting, sorted, for whole-index comparisons.
fn snapshot(index: &SearchIndex) -> Vec<(String, Posting)> {
    let mut all: Vec<(String, Posting)> = index
        .terms()
        .flat_map(|term| index.postings(term).unwrap().iter().map(move |p| (term.to_string(), p.clone())))
        .collect();
    all.sort_by(|a, b| (&a.0, &a.1.document_id, &a.1.field).cmp(&(&b.0, &b.1.document_id, &b.1.field)));
    all
}

#[test]
fn boosted_title_outranks_content() {
    let mut index = new_index();
    for doc in engine_docs() {
        index.index(doc);
    }
    let res = index.search("engine design", &SearchOptions::default());
    assert_eq!(res.total, 2);
    assert_eq!(res.tokens, vec!["engine", "design"]);
    assert_eq!(res.results[0].document.id, "doc1");
    assert_eq!(res.results[1].document.id, "doc2");
    assert!(res.results[0].score > res.results[1].score);
    // both documents matched both terms
    assert_eq!(res.results[1].matched_terms, vec!["engine", "design"]);
}

#[test]
fn suggest_after_indexing() {
    let mut index = new_index();
    for doc in engine_docs() {
        index.index(doc);
    }
    let suggestions = index.suggest("eng", Some(5));
    let engine = suggestions.iter().find(|s| s.term == "engine").expect("engine suggested");
    assert!(engine.frequency >= 2);
}

#[test]
fn removed_document_disappears_from_results() {
    let mut index = new_index();
    for doc in engine_docs() {
        index.index(doc);
    }
    let summary = index.remove_document("doc1");
    assert!(summary.removed);
    assert_eq!(ids(&index, "engine", &SearchOptions::default()), vec!["doc2"]);
    // "database" only lived in doc1
    assert!(index.postings("database").is_none());
}

#[test]
fn reindexing_is_idempotent() {
    let doc = Document::new("d", "note")
        .field("title", "Weekly planning")
        .field("content", "planning the release, then planning the retro");

    let mut once = new_index();
    once.index(doc.clone());
    let mut twice = new_index();
    twice.index(doc.clone());
    let summary = twice.index(doc);

    assert_eq!(summary.field_count, 2);
    assert_eq!(once.stats(), twice.stats());
    assert_eq!(snapshot(&once), snapshot(&twice));
}

#[test]
fn removal_is_complete() {
    let mut index = new_index();
    index.index(Document::new("a", "fact").field("content", "shared alpha"));
    index.index(Document::new("b", "fact").field("title", "shared bravo").field("content", "shared"));
    index.index(Document::new("c", "contact").field("content", "shared charlie"));

    let before = index.stats().total_documents;
    index.remove_document("b");
    assert_eq!(index.stats().total_documents, before - 1);
    assert!(snapshot(&index).iter().all(|(_, p)| p.document_id != "b"));
    assert!(index.postings("bravo").is_none());
    assert!(index.get_document("b").is_none());

    index.remove_document("b");
    assert_eq!(index.stats().total_documents, before - 1);
}

#[test]
fn no_empty_posting_lists_survive() {
    let mut index = new_index();
    index.index(Document::new("a", "fact").field("content", "lonely term"));
    index.remove_document("a");
    assert_eq!(index.term_count(), 0);
    assert_eq!(index.terms().count(), 0);
}

#[test]
fn rebuild_matches_incremental_indexing() {
    let docs = vec![
        Document::new("1", "fact").field("title", "Rust search engine").field("content", "inverted index"),
        Document::new("2", "decision").field("content", "choose an inverted index for search"),
        Document::new("3", "fact").field("content", "engine maintenance schedule"),
        Document::new("4", "contact").field("title", "Search team").meta("email", "team@example.com"),
    ];

    let mut incremental = new_index();
    for doc in docs.clone() {
        incremental.index(doc);
    }
    let mut rebuilt = new_index();
    rebuilt.index(Document::new("stale", "fact").field("content", "search leftovers"));
    let summary = rebuilt.rebuild(docs).unwrap();
    assert_eq!(summary.count, 4);

    for query in ["search", "inverted index", "engine", "team"] {
        let a = incremental.search(query, &SearchOptions::default());
        let b = rebuilt.search(query, &SearchOptions::default());
        let key = |r: &lexis_core::SearchResponse| {
            r.results.iter().map(|h| (h.document.id.clone(), h.score, h.matched_terms.clone())).collect::<Vec<_>>()
        };
        assert_eq!(key(&a), key(&b), "query {query:?}");
        assert_eq!(a.total, b.total);
    }
}

#[test]
fn boost_is_monotonic() {
    let mut index = new_index();
    index.index(Document::new("boosted", "fact").field("title", "kernel scheduler"));
    index.index(Document::new("plain", "fact").field("content", "kernel scheduler"));
    index.index(Document::new("unlisted", "fact").field("notes", "kernel scheduler"));
    let res = index.search("kernel", &SearchOptions::default());
    let score = |id: &str| res.results.iter().find(|h| h.document.id == id).unwrap().score;
    assert!(score("boosted") >= score("plain"));
    assert!(score("boosted") > score("plain"));
    // unconfigured fields boost at 1.0
    assert_eq!(score("plain"), score("unlisted"));
}

#[test]
fn pagination_covers_every_result_once() {
    let mut index = new_index();
    for i in 0..23 {
        let text = vec!["widget"; 1 + i % 5].join(" ");
        let doc_type = if i % 3 == 0 { "contact" } else { "fact" };
        index.index(Document::new(format!("w{i:02}"), doc_type).field("content", text));
    }

    for options in [SearchOptions::default(), SearchOptions::default().with_type("fact")] {
        let full = index.search("widget", &options.clone().with_limit(1000));
        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let page = index.search("widget", &options.clone().with_limit(4).with_offset(offset));
            assert_eq!(page.total, full.total);
            if page.results.is_empty() {
                break;
            }
            paged.extend(page.results.into_iter().map(|h| h.document.id));
            offset += 4;
        }
        let expected: Vec<String> = full.results.into_iter().map(|h| h.document.id).collect();
        assert_eq!(paged, expected);
    }

    assert_eq!(index.search("widget", &SearchOptions::default()).total, 23);
    assert_eq!(index.search("widget", &SearchOptions::default()).results.len(), 20);
    assert_eq!(index.search("widget", &SearchOptions::default().with_type("contact")).total, 8);
}

#[test]
fn metadata_is_kept_on_the_record() {
    let mut index = new_index();
    index.index(
        Document::new("c1", "contact")
            .field("name", "Ana Souza")
            .meta("email", "ana@example.com")
            .meta("source", "crm"),
    );
    let hit = &index.search("souza", &SearchOptions::default()).results[0];
    assert_eq!(hit.document.doc_type, "contact");
    assert_eq!(hit.document.metadata["email"], "ana@example.com");
    assert_eq!(hit.document.metadata["source"], "crm");
}
