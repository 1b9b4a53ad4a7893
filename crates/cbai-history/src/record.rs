//! Run-record data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunSource {
    #[default]
    Manual,
    Daemon,
    Rerun,
}

impl fmt::Display for RunSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Daemon => f.write_str("daemon"),
            Self::Rerun => f.write_str("rerun"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Success,
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One immutable audit entry per execution attempt. Written as a single
/// JSON line, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRunRecord {
    pub id: String,
    /// ISO-8601 wall-clock time of the run.
    pub timestamp: String,
    /// Canonical action id (after alias resolution).
    pub action: String,
    pub args: Vec<String>,
    pub source: RunSource,
    pub trigger: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub status: RunStatus,
    pub copy: bool,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Back-reference to the record this run replays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_of: Option<String>,
}

/// Record under construction: `id` and `timestamp` are generated at
/// append time when absent.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub action: String,
    pub args: Vec<String>,
    pub source: RunSource,
    pub trigger: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
    pub status: RunStatus,
    pub copy: bool,
    pub input: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub replay_of: Option<String>,
}

impl RecordDraft {
    /// Finalize the draft, generating `id` and `timestamp` if absent.
    #[must_use]
    pub fn seal(self) -> ActionRunRecord {
        ActionRunRecord {
            id: self.id.unwrap_or_else(generate_id),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            action: self.action,
            args: self.args,
            source: self.source,
            trigger: self.trigger,
            provider: self.provider,
            model: self.model,
            latency_ms: self.latency_ms,
            status: self.status,
            copy: self.copy,
            input: self.input,
            output: self.output,
            error: self.error,
            replay_of: self.replay_of,
        }
    }
}

/// Timestamp-based id with a random suffix: sortable and unique enough
/// for a single-user log.
fn generate_id() -> String {
    let millis = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!("{}-{suffix}", to_base36(millis))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_owned();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[usize::try_from(n % 36).unwrap_or(0)]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
