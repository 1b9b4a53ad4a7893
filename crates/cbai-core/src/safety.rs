//! Safe-mode policy gate.
//!
//! Safe mode only restricts cloud egress: local providers always pass.
//! Daemon-triggered runs have nobody to ask, so a cloud call under safe
//! mode is blocked outright instead of prompting.

use std::future::Future;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::AgentConfig;
use crate::trust::is_cloud_provider;

#[derive(Debug, thiserror::Error)]
pub enum SafeModeError {
    /// Callers match on this message in daemon integrations; keep the
    /// wording stable.
    #[error("safe mode: blocked cloud call to {provider} (daemon auto-triggered)")]
    DaemonBlocked { provider: String },

    #[error("safe mode: user declined cloud provider call")]
    Declined,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SafeModeOptions {
    /// Skip the interactive confirmation (`--yes`).
    pub yes: bool,
    /// Daemon-triggered execution: no terminal, never prompt.
    pub daemon: bool,
}

/// Interactive yes/no confirmation seam.
pub trait ConfirmPrompt {
    /// Ask a question and resolve to `true` only on an affirmative answer.
    fn confirm(&self, message: &str) -> impl Future<Output = std::io::Result<bool>> + Send;
}

/// Production prompt: question on stderr, one line read from stdin.
/// Blocks indefinitely; a human is expected on the other end.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrPrompt;

impl ConfirmPrompt for StderrPrompt {
    async fn confirm(&self, message: &str) -> std::io::Result<bool> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{message} [y/N] ").as_bytes()).await?;
        stderr.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

/// Enforce the safe-mode policy for one run.
///
/// Decision order: safe mode off → allow; local provider → allow; daemon
/// run → block; `--yes` → allow; otherwise prompt and allow only on "y"
/// (case-insensitive). Empty input, EOF, and prompt I/O failures all
/// count as a decline.
///
/// # Errors
///
/// Returns [`SafeModeError::DaemonBlocked`] or [`SafeModeError::Declined`]
/// when the cloud call is not permitted.
pub async fn enforce_safe_mode<P: ConfirmPrompt>(
    config: &AgentConfig,
    opts: SafeModeOptions,
    prompt: &P,
) -> Result<(), SafeModeError> {
    if !config.settings.safe_mode {
        return Ok(());
    }

    if !is_cloud_provider(&config.provider.kind, config.provider.endpoint.as_deref()) {
        return Ok(());
    }

    let provider = config.provider.label().to_owned();

    if opts.daemon {
        return Err(SafeModeError::DaemonBlocked { provider });
    }

    if opts.yes {
        return Ok(());
    }

    let question = format!("Safe mode: send clipboard to cloud provider \"{provider}\"?");
    if prompt.confirm(&question).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(SafeModeError::Declined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderConfig, Settings};

    /// Canned-answer prompt that records whether it was consulted.
    struct StubPrompt {
        answer: &'static str,
        asked: std::sync::atomic::AtomicBool,
    }

    impl StubPrompt {
        fn new(answer: &'static str) -> Self {
            Self {
                answer,
                asked: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn was_asked(&self) -> bool {
            self.asked.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl ConfirmPrompt for StubPrompt {
        async fn confirm(&self, _message: &str) -> std::io::Result<bool> {
            self.asked.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(self.answer.trim().eq_ignore_ascii_case("y"))
        }
    }

    fn config(kind: &str, endpoint: Option<&str>, safe_mode: bool) -> AgentConfig {
        AgentConfig {
            provider: ProviderConfig {
                kind: kind.into(),
                endpoint: endpoint.map(Into::into),
                model: "mistral".into(),
                api_key: None,
            },
            actions: std::collections::BTreeMap::new(),
            settings: Settings {
                poll_interval: 150,
                safe_mode,
                notifications: false,
                log_level: "info".into(),
            },
        }
    }

    fn opts(yes: bool, daemon: bool) -> SafeModeOptions {
        SafeModeOptions { yes, daemon }
    }

    #[tokio::test]
    async fn safe_mode_off_allows_cloud() {
        let prompt = StubPrompt::new("n");
        let result = enforce_safe_mode(&config("openai", None, false), opts(false, false), &prompt).await;
        assert!(result.is_ok());
        assert!(!prompt.was_asked());
    }

    #[tokio::test]
    async fn local_provider_allowed_regardless() {
        let prompt = StubPrompt::new("n");
        let result = enforce_safe_mode(&config("ollama", None, true), opts(false, true), &prompt).await;
        assert!(result.is_ok());
        assert!(!prompt.was_asked());
    }

    #[tokio::test]
    async fn daemon_blocks_cloud_even_with_yes() {
        let prompt = StubPrompt::new("y");
        let result = enforce_safe_mode(&config("openai", None, true), opts(true, true), &prompt).await;
        let err = result.unwrap_err();
        assert!(matches!(err, SafeModeError::DaemonBlocked { .. }));
        assert!(err.to_string().contains("openai"));
        assert!(err.to_string().contains("daemon"));
        assert!(!prompt.was_asked());
    }

    #[tokio::test]
    async fn yes_flag_skips_prompt() {
        let prompt = StubPrompt::new("n");
        let result = enforce_safe_mode(&config("openai", None, true), opts(true, false), &prompt).await;
        assert!(result.is_ok());
        assert!(!prompt.was_asked());
    }

    #[tokio::test]
    async fn prompt_affirmative_allows() {
        for answer in ["y", "Y", " y "] {
            let prompt = StubPrompt::new(answer);
            let result =
                enforce_safe_mode(&config("openai", None, true), opts(false, false), &prompt).await;
            assert!(result.is_ok(), "answer {answer:?} should allow");
            assert!(prompt.was_asked());
        }
    }

    #[tokio::test]
    async fn prompt_decline_fails() {
        for answer in ["n", "", "yes sir", "q"] {
            let prompt = StubPrompt::new(answer);
            let result =
                enforce_safe_mode(&config("openai", None, true), opts(false, false), &prompt).await;
            assert!(
                matches!(result, Err(SafeModeError::Declined)),
                "answer {answer:?} should decline"
            );
        }
    }

    #[tokio::test]
    async fn custom_remote_endpoint_is_gated() {
        let prompt = StubPrompt::new("n");
        let cfg = config("custom", Some("https://api.example.com/v1"), true);
        let result = enforce_safe_mode(&cfg, opts(false, false), &prompt).await;
        assert!(result.is_err());
        assert!(prompt.was_asked());
    }

    #[tokio::test]
    async fn custom_loopback_endpoint_passes() {
        let prompt = StubPrompt::new("n");
        let cfg = config("custom", Some("http://127.0.0.1:8080/v1"), true);
        let result = enforce_safe_mode(&cfg, opts(false, false), &prompt).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn daemon_block_names_endpoint_when_kind_empty() {
        let prompt = StubPrompt::new("y");
        let cfg = config("", Some("https://llm.internal/v1"), true);
        let err = enforce_safe_mode(&cfg, opts(false, true), &prompt)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("https://llm.internal/v1"));
    }
}
