//! The indexing run itself: the incremental update protocol that decides,
//! file by file, whether to skip, refresh metadata, or fully re-extract.
//! Factored out of `bin/makemandb.rs` so it can be driven directly in tests
//! without shelling out to the external `man -p` collaborator.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::extract;
use crate::hash::hash_file;
use crate::store::Store;
use crate::types::{FileIdentity, ReindexDecision};
use crate::walk::{CacheRow, FileCache};
use crate::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub new: usize,
    pub link: usize,
    pub err: usize,
}

/// Walk every directory in `roots`, then run each candidate through the
/// `needs_reindex` decision and apply the matching store operation. The
/// whole run is one transaction. Pruning is left to the caller, since the
/// `-f` force-rebuild flag skips it.
pub fn index_roots(store: &Store, roots: &[PathBuf], names_only: bool) -> Result<(Summary, FileCache)> {
    let mut cache = FileCache::new();
    for root in roots {
        cache.scan_dir(root);
    }

    let mut summary = Summary {
        total: cache.len(),
        ..Summary::default()
    };

    let progress = ProgressBar::new(cache.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    store.begin_update()?;
    for row in cache.rows() {
        progress.inc(1);
        match index_one(store, row, names_only) {
            Ok(Outcome::New) => summary.new += 1,
            Ok(Outcome::Link) => summary.link += 1,
            Ok(Outcome::Unchanged) => {}
            Err(err) => {
                eprintln!("makemandb: {}: {err}", row.path.display());
                summary.err += 1;
            }
        }
    }
    store.commit_update()?;
    progress.finish_and_clear();

    Ok((summary, cache))
}

enum Outcome {
    New,
    Link,
    Unchanged,
}

fn index_one(store: &Store, row: &CacheRow, names_only: bool) -> Result<Outcome> {
    let content_hash = hash_file(&row.path)?;

    let identity = FileIdentity {
        device: row.device,
        inode: row.inode,
        mtime: row.mtime,
        path: row.path.clone(),
        content_hash,
    };

    match store.needs_reindex(&identity)? {
        ReindexDecision::Unchanged => Ok(Outcome::Unchanged),
        ReindexDecision::SameHashDifferentMeta => {
            store.update_metadata(&identity)?;
            Ok(Outcome::Link)
        }
        ReindexDecision::NewOrModified => {
            let extracted = extract::extract(&row.path, names_only)?;
            store.upsert_document(&extracted.document, &identity)?;
            store.rewrite_links(
                &extracted.document.name,
                &extracted.document.section,
                &extracted.links,
                extracted.machine.as_deref(),
            )?;
            Ok(Outcome::New)
        }
    }
}

pub fn man_path_directories() -> Result<Vec<PathBuf>> {
    let output = std::process::Command::new("man")
        .arg("-p")
        .output()
        .map_err(|source| Error::Io {
            path: PathBuf::from("man"),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::Io {
            path: PathBuf::from("man -p"),
            source: std::io::Error::other("man -p exited with a non-zero status"),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.lines().map(PathBuf::from).collect())
}
