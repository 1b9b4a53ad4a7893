//! Agent log viewing.

use std::path::PathBuf;

use anyhow::{Context, bail};

/// Overrides where agent logs are looked up (tests and automation).
pub const LOG_DIR_ENV: &str = "CBAI_LOG_DIR";

fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV).map_or_else(cbai_core::paths::app_dir, PathBuf::from)
}

/// Print the last `tail` lines of the agent's log (or error log).
pub async fn show_logs(tail: usize, err: bool) -> anyhow::Result<()> {
    if tail == 0 {
        bail!("--tail must be positive");
    }

    let file = if err { "agent.err" } else { "agent.log" };
    let path = log_dir().join(file);
    if !path.exists() {
        println!("No log file at {}", path.display());
        return Ok(());
    }

    let data = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let lines: Vec<&str> = data.lines().collect();
    let start = lines.len().saturating_sub(tail);
    for line in &lines[start..] {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    async fn zero_tail_is_rejected() {
        let err = show_logs(0, false).await.unwrap_err();
        assert!(err.to_string().contains("--tail must be positive"));
    }

    #[tokio::test]
    #[serial]
    async fn missing_log_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var(LOG_DIR_ENV, dir.path()) };
        let result = show_logs(10, false).await;
        unsafe { std::env::remove_var(LOG_DIR_ENV) };
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn reads_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("agent.log"), "one\ntwo\nthree\n")
            .await
            .unwrap();
        unsafe { std::env::set_var(LOG_DIR_ENV, dir.path()) };
        let result = show_logs(2, false).await;
        unsafe { std::env::remove_var(LOG_DIR_ENV) };
        assert!(result.is_ok());
    }
}
