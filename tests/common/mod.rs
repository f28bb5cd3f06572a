//! Shared fixtures for end-to-end and property tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use mandb::indexer::{self, Summary};
use mandb::store::{OpenMode, Store};
use mandb::walk::FileCache;

pub const LS_PAGE: &str = ".Dd January 1, 2024\n.Dt LS 1\n.Os\n\
    .Sh NAME\n.Nm ls\n.Nd list directory contents\n\
    .Sh DESCRIPTION\nThe ls utility lists files.\n";

pub const PRINTF_PAGE: &str = ".TH PRINTF 3\n.SH NAME\nprintf \\- formatted output conversion\n\
    .SH DESCRIPTION\nThe printf function writes formatted output.\n\
    .SH \"SEE ALSO\"\nmalloc(3)\n";

pub const MALLOC_PAGE: &str = ".TH MALLOC 3\n.SH NAME\nmalloc \\- allocate dynamic memory\n\
    .SH DESCRIPTION\nThe malloc function allocates memory of the requested size.\n";

pub fn write_page(dir: &Path, filename: &str, contents: &str) {
    fs::write(dir.join(filename), contents).unwrap();
}

/// Open a fresh in-memory-equivalent index file and index `dir` once.
pub fn open_and_index(db_path: &Path, dir: &Path, force: bool) -> (Store, Summary, FileCache) {
    let mode = if force || !db_path.exists() { OpenMode::Create } else { OpenMode::Write };
    let store = Store::open(db_path, mode).unwrap();
    let (summary, cache) = indexer::index_roots(&store, &[dir.to_path_buf()], false).unwrap();
    if !force {
        store.prune_absent(&cache).unwrap();
    }
    (store, summary, cache)
}

pub fn document_count(store: &Store) -> i64 {
    store
        .connection()
        .query_row("SELECT COUNT(*) FROM mandb_meta", [], |row| row.get(0))
        .unwrap()
}
