//! Append-only audit log of action runs.

pub mod record;
pub mod store;

pub use record::{ActionRunRecord, RecordDraft, RunSource, RunStatus};
pub use store::{HISTORY_FILE_ENV, HistoryError, HistoryStore};
