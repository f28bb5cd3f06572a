//! IndexStore: the persistent SQLite-backed index.
//!
//! A `fts4` table carries the searchable columns; `mandb_meta` and
//! `mandb_links` carry everything a `Document` row itself cannot ("the
//! content lives in the FTS table, identity and aliasing live beside it").
//! `fts4` rather than `fts5` because the ranking function needs
//! `matchinfo(..., "pclxn")`, which `fts5` dropped in favor of its own
//! auxiliary-function API (see `crate::scoring`).

mod schema;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use rusqlite::{params, Connection, OpenFlags};

use crate::error::{Error, Result};
use crate::scoring::{self, IdfCache};
use crate::types::{FileIdentity, ReindexDecision};
use crate::walk::FileCache;

/// How `Store::open` should treat a missing index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `apropos`: the index must already exist.
    ReadOnly,
    /// `makemandb` without `-f`: reuse an existing index.
    Write,
    /// `makemandb -f` or a first run: create the file if absent.
    Create,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Store> {
        let flags = match mode {
            OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
            OpenMode::Write => OpenFlags::SQLITE_OPEN_READ_WRITE,
            OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        };
        let conn = Connection::open_with_flags(path, flags)?;
        if mode == OpenMode::Create {
            schema::create_schema(&conn)?;
        }
        Ok(Store { conn })
    }

    /// Register the `rank_func` scalar used by `ORDER BY rank_func(matchinfo(...))
    /// DESC`, returning the per-query IDF cache the caller must reset before
    /// each `search` call: IDF is computed once per query, not once per row.
    pub fn register_ranker(&self) -> Result<Rc<IdfCache>> {
        scoring::register(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a bulk indexing run. A whole `makemandb` pass is one
    /// transaction: partial progress is never visible to concurrent
    /// readers, and `synchronous = OFF` is acceptable because a crash
    /// mid-run simply means the transaction never commits.
    pub fn begin_update(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA synchronous = OFF; BEGIN;")?;
        Ok(())
    }

    pub fn commit_update(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    /// Collapse the FTS segments left behind by incremental updates. Run
    /// once, after a commit, never inside the update transaction itself.
    pub fn optimize(&self) -> Result<()> {
        self.conn.execute("INSERT INTO mandb(mandb) VALUES ('optimize')", [])?;
        Ok(())
    }

    /// Decide what a freshly-stat'd file should become in this run.
    pub fn needs_reindex(&self, identity: &FileIdentity) -> Result<ReindexDecision> {
        let path_str = identity.path.to_string_lossy().to_string();

        let existing: Option<(i64, i64, i64, String)> = self
            .conn
            .query_row(
                "SELECT device, inode, mtime, hash FROM mandb_meta WHERE path = ?1",
                params![path_str],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional_row()?;

        if let Some((device, inode, mtime, hash)) = existing {
            let same_stat =
                device as u64 == identity.device && inode as u64 == identity.inode && mtime == identity.mtime;
            if same_stat && hash == identity.content_hash {
                return Ok(ReindexDecision::Unchanged);
            }
            if hash == identity.content_hash {
                return Ok(ReindexDecision::SameHashDifferentMeta);
            }
        }

        let hash_seen_elsewhere: Option<i64> = self
            .conn
            .query_row(
                "SELECT doc_id FROM mandb_meta WHERE hash = ?1 LIMIT 1",
                params![identity.content_hash],
                |row| row.get(0),
            )
            .optional_row()?;

        if hash_seen_elsewhere.is_some() {
            return Ok(ReindexDecision::SameHashDifferentMeta);
        }

        Ok(ReindexDecision::NewOrModified)
    }

    /// Insert a new `Document` and its metadata row.
    ///
    /// On a `path` conflict (the same file re-parsed with different
    /// content), the old document row is deleted and the metadata row is
    /// updated in place rather than replaced, so its identity in
    /// `mandb_meta` survives even though `doc_id` changes to point at the
    /// freshly-inserted content.
    pub fn upsert_document(&self, document: &crate::types::Document, identity: &FileIdentity) -> Result<i64> {
        let new_doc_id = self.insert_fts_row(document)?;
        let path_str = identity.path.to_string_lossy().to_string();

        let insert_result = self.conn.execute(
            "INSERT INTO mandb_meta (device, inode, mtime, path, hash, doc_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                identity.device as i64,
                identity.inode as i64,
                identity.mtime,
                path_str,
                identity.content_hash,
                new_doc_id
            ],
        );

        match insert_result {
            Ok(_) => Ok(new_doc_id),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                self.replace_on_conflict(identity, new_doc_id)
            }
            Err(err) => {
                self.conn.execute("DELETE FROM mandb WHERE rowid = ?1", params![new_doc_id])?;
                Err(Error::Store(err))
            }
        }
    }

    fn replace_on_conflict(&self, identity: &FileIdentity, new_doc_id: i64) -> Result<i64> {
        let path_str = identity.path.to_string_lossy().to_string();

        let old_doc_id: i64 = self.conn.query_row(
            "SELECT doc_id FROM mandb_meta WHERE path = ?1",
            params![path_str],
            |row| row.get(0),
        )?;

        self.conn.execute("DELETE FROM mandb WHERE rowid = ?1", params![old_doc_id])?;

        let updated = self.conn.execute(
            "UPDATE mandb_meta SET device = ?1, inode = ?2, mtime = ?3, hash = ?4, doc_id = ?5 WHERE path = ?6",
            params![
                identity.device as i64,
                identity.inode as i64,
                identity.mtime,
                identity.content_hash,
                new_doc_id,
                path_str
            ],
        )?;

        if updated == 0 {
            return Err(Error::StoreConstraint(format!(
                "second metadata conflict while replacing {}",
                identity.path.display()
            )));
        }

        Ok(new_doc_id)
    }

    /// Metadata-only update: a hardlink/symlink sharing an already-indexed
    /// hash, or a re-stat of the same path with unchanged content (mtime
    /// bumped by a `touch`, say). Either way no new `Document` is created.
    pub fn update_metadata(&self, identity: &FileIdentity) -> Result<()> {
        let doc_id: i64 = self.conn.query_row(
            "SELECT doc_id FROM mandb_meta WHERE hash = ?1 LIMIT 1",
            params![identity.content_hash],
            |row| row.get(0),
        )?;

        let path_str = identity.path.to_string_lossy().to_string();
        self.conn.execute(
            "INSERT INTO mandb_meta (device, inode, mtime, path, hash, doc_id) VALUES (?1,?2,?3,?4,?5,?6)
             ON CONFLICT(path) DO UPDATE SET
                device = excluded.device,
                inode = excluded.inode,
                mtime = excluded.mtime,
                hash = excluded.hash,
                doc_id = excluded.doc_id",
            params![
                identity.device as i64,
                identity.inode as i64,
                identity.mtime,
                path_str,
                identity.content_hash,
                doc_id
            ],
        )?;
        Ok(())
    }

    /// Replace the link set for one target name/section pair.
    pub fn rewrite_links(&self, target_name: &str, section: &str, links: &[String], machine: Option<&str>) -> Result<()> {
        self.conn.execute(
            "DELETE FROM mandb_links WHERE target_name = ?1 AND section = ?2",
            params![target_name, section],
        )?;
        for link_name in links {
            self.conn.execute(
                "INSERT INTO mandb_links (link_name, target_name, section, machine) VALUES (?1, ?2, ?3, ?4)",
                params![link_name, target_name, section, machine],
            )?;
        }
        Ok(())
    }

    /// Delete every indexed document whose path is absent from `cache`,
    /// returning how many were removed.
    pub fn prune_absent(&self, cache: &FileCache) -> Result<usize> {
        let cache_paths: std::collections::HashSet<String> =
            cache.paths().map(|p| p.to_string_lossy().into_owned()).collect();

        let mut stmt = self.conn.prepare(
            "SELECT m.path, m.doc_id, f.name, f.section FROM mandb_meta m JOIN mandb f ON f.rowid = m.doc_id",
        )?;
        let rows: Vec<(String, i64, String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
            .collect::<rusqlite::Result<_>>()?;

        let mut pruned = 0;
        for (path, doc_id, name, section) in rows {
            if cache_paths.contains(&path) {
                continue;
            }
            self.conn.execute("DELETE FROM mandb WHERE rowid = ?1", params![doc_id])?;
            self.conn.execute("DELETE FROM mandb_meta WHERE path = ?1", params![path])?;
            self.conn.execute(
                "DELETE FROM mandb_links WHERE target_name = ?1 AND section = ?2",
                params![name, section],
            )?;
            pruned += 1;
        }
        Ok(pruned)
    }

    fn insert_fts_row(&self, document: &crate::types::Document) -> Result<i64> {
        let cols = document.columns();
        self.conn.execute(
            "INSERT INTO mandb (section, name, name_desc, description, library, synopsis,
                return_values, environment, files, exit_status, diagnostics, errors)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            params![
                cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7], cols[8], cols[9], cols[10],
                cols[11]
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// Helper for path lookups that may legitimately find nothing.
trait OptionalRow<T> {
    fn optional_row(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalRow<T> for rusqlite::Result<T> {
    fn optional_row(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;

    fn sample_identity(path: &str, hash: &str) -> FileIdentity {
        FileIdentity {
            device: 1,
            inode: 2,
            mtime: 1000,
            path: PathBuf::from(path),
            content_hash: hash.to_string(),
        }
    }

    fn sample_document(name: &str) -> Document {
        Document {
            section: "1".to_string(),
            name: name.to_string(),
            name_desc: "does a thing".to_string(),
            description: "Full description.".to_string(),
            ..Document::default()
        }
    }

    #[test]
    fn first_sighting_is_new_or_modified() {
        let store = Store::open(Path::new(":memory:"), OpenMode::Create).unwrap();
        let identity = sample_identity("/usr/share/man/man1/ls.1", "abc123");
        assert_eq!(store.needs_reindex(&identity).unwrap(), ReindexDecision::NewOrModified);
    }

    #[test]
    fn unchanged_stat_and_hash_is_unchanged() {
        let store = Store::open(Path::new(":memory:"), OpenMode::Create).unwrap();
        let identity = sample_identity("/usr/share/man/man1/ls.1", "abc123");
        store.upsert_document(&sample_document("ls"), &identity).unwrap();
        assert_eq!(store.needs_reindex(&identity).unwrap(), ReindexDecision::Unchanged);
    }

    #[test]
    fn hardlink_with_same_hash_is_metadata_only() {
        let store = Store::open(Path::new(":memory:"), OpenMode::Create).unwrap();
        let original = sample_identity("/usr/share/man/man1/ls.1", "abc123");
        store.upsert_document(&sample_document("ls"), &original).unwrap();

        let hardlink = sample_identity("/usr/share/man/man1/ls.alias.1", "abc123");
        assert_eq!(store.needs_reindex(&hardlink).unwrap(), ReindexDecision::SameHashDifferentMeta);
        store.update_metadata(&hardlink).unwrap();
        assert_eq!(store.needs_reindex(&hardlink).unwrap(), ReindexDecision::Unchanged);
    }

    #[test]
    fn content_edit_replaces_the_document_but_keeps_the_metadata_row() {
        let store = Store::open(Path::new(":memory:"), OpenMode::Create).unwrap();
        let identity = sample_identity("/usr/share/man/man1/ls.1", "abc123");
        let first_doc_id = store.upsert_document(&sample_document("ls"), &identity).unwrap();

        let edited = sample_identity("/usr/share/man/man1/ls.1", "def456");
        let second_doc_id = store.upsert_document(&sample_document("ls"), &edited).unwrap();

        assert_ne!(first_doc_id, second_doc_id);
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM mandb_meta WHERE path = ?1", params!["/usr/share/man/man1/ls.1"], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn prune_removes_documents_for_paths_missing_from_the_cache() {
        let store = Store::open(Path::new(":memory:"), OpenMode::Create).unwrap();
        let identity = sample_identity("/usr/share/man/man1/gone.1", "abc123");
        store.upsert_document(&sample_document("gone"), &identity).unwrap();

        let cache = FileCache::new();
        let pruned = store.prune_absent(&cache).unwrap();
        assert_eq!(pruned, 1);
    }
}
