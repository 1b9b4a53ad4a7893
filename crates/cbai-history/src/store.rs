//! JSONL history file I/O.
//!
//! One record per line, append-only. Concurrent appenders interleave at
//! line granularity; no locking for a single-user local tool.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::record::{ActionRunRecord, RecordDraft};

/// Overrides the history file location (tests and automation).
pub const HISTORY_FILE_ENV: &str = "CBAI_HISTORY_FILE";

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history record parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$CBAI_HISTORY_FILE`, else `~/.clipboard-ai/history.jsonl`.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(HISTORY_FILE_ENV)
            .map_or_else(|_| cbai_core::paths::app_dir().join("history.jsonl"), PathBuf::from);
        Self::new(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seal the draft and append it as one JSON line, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub async fn append(&self, draft: RecordDraft) -> Result<ActionRunRecord, HistoryError> {
        let record = draft.seal();

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(record)
    }

    /// Read records newest-first, optionally truncated to `limit`.
    ///
    /// A missing file is an empty history, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line fails to parse.
    pub async fn read(&self, limit: Option<usize>) -> Result<Vec<ActionRunRecord>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let data = tokio::fs::read_to_string(&self.path).await?;
        let mut records = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str::<ActionRunRecord>)
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();

        if let Some(limit) = limit {
            records.truncate(limit);
        }

        Ok(records)
    }

    /// Point lookup by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ActionRunRecord>, HistoryError> {
        let records = self.read(None).await?;
        Ok(records.into_iter().find(|record| record.id == id))
    }
}
