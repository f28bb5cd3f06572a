//! Property tests for the index's core invariants: round-tripping,
//! incremental reindexing, and ranking behavior under random input.

mod common;

use std::fs;

use common::*;
use mandb::store::{OpenMode, Store};
use mandb::types::{Document, FileIdentity};
use proptest::prelude::*;

fn doc(name: &str, hash: &str, path: &str) -> (Document, FileIdentity) {
    let document = Document {
        section: "1".to_string(),
        name: name.to_string(),
        name_desc: format!("{name} does a thing"),
        description: "Full description text.".to_string(),
        ..Document::default()
    };
    let identity = FileIdentity {
        device: 1,
        inode: path.len() as u64,
        mtime: 1000,
        path: path.into(),
        content_hash: hash.to_string(),
    };
    (document, identity)
}

#[test]
fn p1_rerun_with_no_changes_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let db = tempfile::NamedTempFile::new().unwrap();
    fs::remove_file(db.path()).ok();
    write_page(dir.path(), "ls.1", LS_PAGE);

    open_and_index(db.path(), dir.path(), true);
    let (store, second, _cache) = open_and_index(db.path(), dir.path(), false);
    assert_eq!(second.new, 0);
    assert_eq!(document_count(&store), 1);
}

proptest! {
    #[test]
    fn p3_two_paths_same_hash_yield_one_document(a in "[a-z]{3,10}", b in "[a-z]{3,10}") {
        prop_assume!(a != b);
        let store = Store::open(std::path::Path::new(":memory:"), OpenMode::Create).unwrap();
        let (document, identity_a) = doc("thing", "sharedhash", &format!("/man/{a}.1"));
        store.upsert_document(&document, &identity_a).unwrap();

        let identity_b = FileIdentity { path: format!("/man/{b}.1").into(), ..identity_a.clone() };
        store.update_metadata(&identity_b).unwrap();

        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM mandb", [], |row| row.get(0))
            .unwrap();
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn p6_idf_cache_is_deterministic_across_identical_queries(seed in "[a-z]{4,8}") {
        let store = Store::open(std::path::Path::new(":memory:"), OpenMode::Create).unwrap();
        let (document, identity) = doc(&seed, "h1", &format!("/man/{seed}.1"));
        store.upsert_document(&document, &identity).unwrap();

        let engine = mandb::QueryEngine::new(&store).unwrap();
        let first = engine.search(&seed, &[], false, true).unwrap();
        let second = engine.search(&seed, &[], false, true).unwrap();
        prop_assert_eq!(first[0].score.to_bits(), second[0].score.to_bits());
    }

    #[test]
    fn p7_section_filter_only_returns_matching_sections(section in 1u8..=9) {
        let store = Store::open(std::path::Path::new(":memory:"), OpenMode::Create).unwrap();
        let document = Document {
            section: section.to_string(),
            name: "widget".to_string(),
            name_desc: "widget does a thing".to_string(),
            description: "Full description.".to_string(),
            ..Document::default()
        };
        let identity = FileIdentity {
            device: 1,
            inode: 1,
            mtime: 0,
            path: "/man/widget".into(),
            content_hash: "h".to_string(),
        };
        store.upsert_document(&document, &identity).unwrap();

        let engine = mandb::QueryEngine::new(&store).unwrap();
        let matching = engine.search("widget", &[char::from(b'0' + section)], false, true).unwrap();
        prop_assert!(matching.iter().all(|h| h.section == section.to_string()));

        let other_section = if section == 9 { 1 } else { section + 1 };
        let excluded = engine.search("widget", &[char::from(b'0' + other_section)], false, true);
        prop_assert!(excluded.is_err());
    }

    #[test]
    fn p8_stopword_accompaniment_does_not_change_the_filtered_query(
        prefix in prop::collection::vec(prop::sample::select(&["the", "a", "how", "why", "of", "is"]), 0..3),
        suffix in prop::collection::vec(prop::sample::select(&["when", "it", "to", "does", "very"]), 0..3),
    ) {
        let base = "malloc function";
        let padded = format!("{} {base} {}", prefix.join(" "), suffix.join(" "));
        prop_assert_eq!(mandb::stopwords::filter_stopwords(&padded), base);
    }
}
