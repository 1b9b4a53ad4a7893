//! Per-user application paths shared by the CLI and its collaborators.

use std::path::PathBuf;

/// The `~/.clipboard-ai` directory holding the agent socket, history log,
/// agent logs, and plugin actions.
#[must_use]
pub fn app_dir() -> PathBuf {
    home::home_dir().unwrap_or_default().join(".clipboard-ai")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dir_ends_with_dot_dir() {
        assert!(app_dir().ends_with(".clipboard-ai"));
    }
}
