//! Execution context derived from the process environment.
//!
//! The daemon sets these variables when it shells out to the CLI, so the
//! pipeline treats them as part of the invocation rather than ad hoc
//! global state.

/// Set to `"true"` by the agent when it triggers a run itself. A daemon
/// run has no terminal attached, so the safe-mode gate must never prompt.
pub const DAEMON_MODE_ENV: &str = "CBAI_DAEMON_MODE";

/// Free-form trigger label override (e.g. `"double-copy"`).
pub const TRIGGER_ENV: &str = "CBAI_TRIGGER";

/// Input text override. An empty string is a valid override, distinct
/// from the variable being unset.
pub const INPUT_TEXT_ENV: &str = "CBAI_INPUT_TEXT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecContext {
    pub daemon_mode: bool,
    pub trigger: Option<String>,
    pub input_override: Option<String>,
}

impl ExecContext {
    /// Snapshot the execution context from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            daemon_mode: std::env::var(DAEMON_MODE_ENV).is_ok_and(|v| v == "true"),
            trigger: std::env::var(TRIGGER_ENV).ok(),
            input_override: std::env::var(INPUT_TEXT_ENV).ok(),
        }
    }

    /// Default trigger label when no override is present.
    #[must_use]
    pub fn default_trigger(&self) -> &'static str {
        if self.daemon_mode { "daemon" } else { "cli" }
    }
}
