// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full-text search index over manual pages: `makemandb` builds it,
//! `apropos` queries it.
//!
//! Indexing walks a set of directories, extracts each page's NAME,
//! synopsis, description and the rest of its sections into a SQLite
//! full-text table, and tracks file identity so a rerun only touches what
//! changed. Querying tokenizes a search string, strips stop words, and ranks
//! matches with a custom TF/IDF scoring function.

pub mod ast;
pub mod cli;
pub mod display;
pub mod error;
pub mod extract;
pub mod hash;
pub mod indexer;
pub mod query;
pub mod scoring;
pub mod store;
pub mod stopwords;
pub mod types;
pub mod walk;

pub use error::{Error, Result};
pub use query::QueryEngine;
pub use store::{OpenMode, Store};

/// Default index file path, used by both binaries when none is configured.
pub const DEFAULT_INDEX_PATH: &str = "./apropos.db";
