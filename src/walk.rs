//! FileCache (C1): an ephemeral snapshot of every candidate file on a run.
//!
//! The list of root directories to walk comes from an external collaborator
//! (conventionally `man -p`); recursing into each one is this module's job.

use std::collections::HashSet;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// One row of the in-memory file cache: `(device, inode, mtime, path)`.
#[derive(Debug, Clone)]
pub struct CacheRow {
    pub device: u64,
    pub inode: u64,
    pub mtime: i64,
    pub path: PathBuf,
}

/// The ephemeral file cache: dropped at the end of the run.
#[derive(Debug, Default)]
pub struct FileCache {
    rows: Vec<CacheRow>,
    seen_devino: HashSet<(u64, u64)>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively walk `root`, inserting one row per candidate file.
    ///
    /// `.`-prefixed entries are skipped. A `stat` failure on an entry is
    /// logged and skipped, not fatal to the run. A duplicate `(device,
    /// inode)` is rejected: the first path wins.
    pub fn scan_dir(&mut self, root: &Path) {
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    eprintln!("makemandb: skipping entry: {err}");
                    continue;
                }
            };

            let file_type = match entry.file_type() {
                Some(ft) => ft,
                None => continue,
            };
            if !file_type.is_file() && !file_type.is_symlink() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    eprintln!("makemandb: stat failed for {}: {err}", entry.path().display());
                    continue;
                }
            };

            self.insert(CacheRow {
                device: metadata.dev(),
                inode: metadata.ino(),
                mtime: metadata.mtime(),
                path: entry.path().to_path_buf(),
            });
        }
    }

    fn insert(&mut self, row: CacheRow) {
        if !self.seen_devino.insert((row.device, row.inode)) {
            return;
        }
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CacheRow] {
        &self.rows
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.rows.iter().map(|r| r.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_dotfiles_and_dedups_hardlinks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ls.1"), b"x").unwrap();
        std::fs::write(dir.path().join(".hidden.1"), b"x").unwrap();
        #[cfg(unix)]
        std::fs::hard_link(dir.path().join("ls.1"), dir.path().join("ls2.1")).unwrap();

        let mut cache = FileCache::new();
        cache.scan_dir(dir.path());

        // ls.1 and ls2.1 share a (device, inode); only the first wins.
        assert_eq!(cache.len(), 1);
        assert!(cache.rows()[0].path.ends_with("ls.1"));
    }
}
