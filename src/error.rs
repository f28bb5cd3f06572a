//! Error taxonomy for indexing and querying.
//!
//! Local failures (one bad manual page, one unreadable file) are swallowed
//! by the caller and counted; only the variants that make a whole run
//! unrecoverable propagate all the way out to `main`.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("IO error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    #[error("failed to hash {path:?}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store constraint violated: {0}")]
    StoreConstraint(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("query reduced to no relevant terms")]
    NoRelevantTerms,

    #[error("Sorry, no relevant results could be obtained")]
    NotFound,
}
