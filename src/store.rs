//! SQLite persistence for summaries and billing records.
//!
//! The store owns one explicit [`rusqlite::Connection`] — callers create a
//! [`Store`] and pass it where it is needed; there is no process-wide
//! database handle. WAL mode keeps readers unblocked while a writer runs.
//!
//! A missing row is `Ok(None)`, not an error: "not found" is a normal
//! answer to a lookup, and callers render a placeholder for it.

use crate::output::{SummaryOutput, SummaryRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open store at '{path}': {detail}")]
    Open { path: PathBuf, detail: String },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS summaries (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    title        TEXT NOT NULL,
    summary_text TEXT NOT NULL,
    file_name    TEXT NOT NULL,
    file_url     TEXT,
    word_count   INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_summaries_user ON summaries(user_id, created_at);

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE,
    full_name   TEXT NOT NULL DEFAULT '',
    customer_id TEXT NOT NULL,
    price_id    TEXT NOT NULL,
    status      TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS payments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL UNIQUE,
    amount     INTEGER NOT NULL,
    status     TEXT NOT NULL,
    price_id   TEXT NOT NULL,
    user_email TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// A new summary row, before it has an id.
#[derive(Debug, Clone)]
pub struct NewSummary<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub summary_text: &'a str,
    pub file_name: &'a str,
    pub file_url: Option<&'a str>,
    /// Word count of the summary text.
    pub word_count: usize,
}

impl<'a> NewSummary<'a> {
    /// Build an insertable row from a pipeline output.
    pub fn from_output(user_id: &'a str, output: &'a SummaryOutput) -> Self {
        Self {
            user_id,
            title: &output.title,
            summary_text: &output.markdown,
            file_name: &output.file_name,
            file_url: crate::pipeline::input::is_url(&output.source)
                .then_some(output.source.as_str()),
            word_count: output.summary_word_count,
        }
    }
}

/// SQLite-backed store for summary and billing rows.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Open an in-memory store (tests, ephemeral runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a summary and return its id.
    pub fn save_summary(&self, new: &NewSummary<'_>) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO summaries (user_id, title, summary_text, file_name, file_url, word_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.user_id,
                new.title,
                new.summary_text,
                new.file_name,
                new.file_url,
                new.word_count as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Saved summary {} ('{}')", id, new.title);
        Ok(id)
    }

    /// Look up a summary by id. `Ok(None)` when no such row exists.
    pub fn get_summary(&self, id: i64) -> Result<Option<SummaryRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, user_id, title, summary_text, file_name, file_url, word_count, created_at
                 FROM summaries WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All summaries belonging to a user, newest first.
    pub fn list_summaries(&self, user_id: &str) -> Result<Vec<SummaryRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, summary_text, file_name, file_url, word_count, created_at
             FROM summaries WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Delete a summary, guarded by ownership. Returns whether a row was
    /// actually removed.
    pub fn delete_summary(&self, id: i64, user_id: &str) -> Result<bool, StoreError> {
        let affected = self.conn.execute(
            "DELETE FROM summaries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SummaryRecord> {
    let created_at: String = row.get(7)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(SummaryRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        summary_text: row.get(3)?,
        file_name: row.get(4)?,
        file_url: row.get(5)?,
        word_count: row.get::<_, i64>(6)? as usize,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<'a>(user_id: &'a str, title: &'a str) -> NewSummary<'a> {
        NewSummary {
            user_id,
            title,
            summary_text: "# Quick Overview\n💡 point\n",
            file_name: "doc.pdf",
            file_url: None,
            word_count: 4,
        }
    }

    #[test]
    fn save_then_get_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let id = store.save_summary(&sample("u1", "Doc")).unwrap();

        let record = store.get_summary(id).unwrap().expect("row must exist");
        assert_eq!(record.id, id);
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.title, "Doc");
        assert_eq!(record.word_count, 4);
        assert!(record.summary_text.contains("Quick Overview"));
    }

    #[test]
    fn missing_summary_is_none_not_error() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_summary(999).unwrap().is_none());
    }

    #[test]
    fn list_is_scoped_to_user_and_newest_first() {
        let store = Store::open_in_memory().unwrap();
        let a = store.save_summary(&sample("u1", "First")).unwrap();
        let b = store.save_summary(&sample("u1", "Second")).unwrap();
        store.save_summary(&sample("u2", "Other")).unwrap();

        let records = store.list_summaries("u1").unwrap();
        assert_eq!(records.len(), 2);
        // Same timestamp second is possible; id breaks the tie.
        assert_eq!(records[0].id, b);
        assert_eq!(records[1].id, a);
    }

    #[test]
    fn delete_requires_matching_owner() {
        let store = Store::open_in_memory().unwrap();
        let id = store.save_summary(&sample("u1", "Mine")).unwrap();

        assert!(!store.delete_summary(id, "intruder").unwrap());
        assert!(store.get_summary(id).unwrap().is_some());

        assert!(store.delete_summary(id, "u1").unwrap());
        assert!(store.get_summary(id).unwrap().is_none());
    }

    #[test]
    fn from_output_marks_url_sources() {
        use crate::output::{SummaryOutput, SummaryStats};
        let output = SummaryOutput {
            title: "T".into(),
            markdown: "# A\np\n".into(),
            source: "https://example.com/doc.pdf".into(),
            file_name: "doc.pdf".into(),
            original_word_count: 100,
            summary_word_count: 2,
            truncated: false,
            stats: SummaryStats {
                provider: "openai".into(),
                failed_attempts: vec![],
                retries: 0,
                input_tokens: 0,
                output_tokens: 0,
                extract_duration_ms: 0,
                llm_duration_ms: 0,
                total_duration_ms: 0,
            },
        };
        let new = NewSummary::from_output("u1", &output);
        assert_eq!(new.file_url, Some("https://example.com/doc.pdf"));

        let mut local = output.clone();
        local.source = "doc.pdf".into();
        let new = NewSummary::from_output("u1", &local);
        assert_eq!(new.file_url, None);
    }
}
