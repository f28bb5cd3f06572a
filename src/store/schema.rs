//! Logical schema for the index file.

use rusqlite::Connection;

use crate::error::Result;

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS mandb USING fts4(
            section, name, name_desc, description, library, synopsis,
            return_values, environment, files, exit_status, diagnostics, errors,
            tokenize=porter
        );

        CREATE TABLE IF NOT EXISTS mandb_meta (
            device INTEGER NOT NULL,
            inode INTEGER NOT NULL,
            mtime INTEGER NOT NULL,
            path TEXT NOT NULL UNIQUE,
            hash TEXT NOT NULL,
            doc_id INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS mandb_meta_hash ON mandb_meta(hash);

        CREATE TABLE IF NOT EXISTS mandb_links (
            link_name TEXT NOT NULL,
            target_name TEXT NOT NULL,
            section TEXT NOT NULL,
            machine TEXT
        );
        CREATE INDEX IF NOT EXISTS mandb_links_target ON mandb_links(target_name, section);",
    )?;
    Ok(())
}
