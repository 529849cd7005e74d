//! SQLite-based `IndexAccess` implementation.
//!
//! This backend stores one logical index in a single table:
//!
//! - `entries(key BLOB PRIMARY KEY, value BLOB NOT NULL)`
//!
//! SQLite's default `BINARY` collation orders `BLOB` primary keys
//! byte-lexicographically, which is exactly the ordering `IndexCursor`
//! requires, so prefix scans are plain `key >= ? ORDER BY key` queries.
//! The connection is configured the same way a read-heavy, single-writer
//! workload is configured elsewhere in this corpus: WAL journaling,
//! `synchronous = NORMAL`, and a busy timeout to avoid transient
//! "database is locked" errors.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{Position, PositionList};

use super::codec;
use super::{IndexAccess, IndexCursor};

/// SQLite-backed implementation of `IndexAccess`.
pub struct SqliteIndexAccess {
    name: String,
    conn: Connection,
}

impl SqliteIndexAccess {
    /// Open (or create) a SQLite-backed index at the given path.
    pub fn open(path: &Path, name: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, name)
    }

    /// An in-memory SQLite-backed index, useful for tests that still want
    /// to exercise the SQL adapter path rather than `InMemoryIndexAccess`.
    pub fn open_in_memory(name: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, name)
    }

    fn from_connection(conn: Connection, name: impl Into<String>) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                key   BLOB PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )?;

        Ok(SqliteIndexAccess {
            name: name.into(),
            conn,
        })
    }

    /// Insert positions under `key`, appending to any existing list.
    pub fn insert(&self, key: &[u8], positions: Vec<Position>) -> Result<()> {
        let mut existing = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?
            .map(|bytes| codec::deserialize(&bytes))
            .transpose()?
            .unwrap_or_default();

        existing.0.extend(positions);
        let encoded = codec::serialize(&existing);

        self.conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, encoded],
        )?;

        Ok(())
    }
}

impl IndexAccess for SqliteIndexAccess {
    fn get(&self, key: &[u8]) -> Result<Option<PositionList>> {
        let bytes: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        bytes.map(|b| codec::deserialize(&b)).transpose()
    }

    fn iterator(&self) -> Result<Box<dyn IndexCursor + '_>> {
        Ok(Box::new(SqliteCursor {
            conn: &self.conn,
            lower_bound: None,
            inclusive: true,
        }))
    }

    fn index_type(&self) -> &str {
        &self.name
    }
}

struct SqliteCursor<'a> {
    conn: &'a Connection,
    lower_bound: Option<Vec<u8>>,
    inclusive: bool,
}

impl<'a> IndexCursor for SqliteCursor<'a> {
    fn seek(&mut self, key: &[u8]) -> Result<()> {
        self.lower_bound = Some(key.to_vec());
        self.inclusive = true;
        Ok(())
    }

    fn seek_to_first(&mut self) -> Result<()> {
        self.lower_bound = None;
        self.inclusive = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<(Vec<u8>, PositionList)>> {
        let row: Option<(Vec<u8>, Vec<u8>)> = match &self.lower_bound {
            None => self
                .conn
                .query_row(
                    "SELECT key, value FROM entries ORDER BY key ASC LIMIT 1",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
            Some(bound) => {
                let sql = if self.inclusive {
                    "SELECT key, value FROM entries WHERE key >= ?1 ORDER BY key ASC LIMIT 1"
                } else {
                    "SELECT key, value FROM entries WHERE key > ?1 ORDER BY key ASC LIMIT 1"
                };
                self.conn
                    .query_row(sql, params![bound], |row| Ok((row.get(0)?, row.get(1)?)))
                    .optional()?
            }
        };

        match row {
            Some((key, value)) => {
                self.lower_bound = Some(key.clone());
                self.inclusive = false;
                let positions = codec::deserialize(&value).context("decoding position list")?;
                Ok(Some((key, positions)))
            }
            None => Ok(None),
        }
    }
}
