//! Input text resolution for a run.

use cbai_core::ExecContext;
use cbai_ipc::{AgentClient, IpcError};

/// The text an action operates on.
///
/// Priority: `CBAI_INPUT_TEXT` (set by the agent when it shells out to
/// the CLI, an empty value is still an override), then the agent's live
/// clipboard. Emptiness is checked by the caller, not here.
pub async fn resolve_input(client: &AgentClient, ctx: &ExecContext) -> Result<String, IpcError> {
    if let Some(text) = &ctx.input_override {
        return Ok(text.clone());
    }
    Ok(client.clipboard().await?.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn override_wins_without_touching_the_agent() {
        // Client points at a socket that does not exist; the override
        // path must never connect.
        let client = AgentClient::new("/nonexistent/agent.sock");
        let ctx = ExecContext {
            input_override: Some("from env".into()),
            ..ExecContext::default()
        };
        assert_eq!(resolve_input(&client, &ctx).await.unwrap(), "from env");
    }

    #[tokio::test]
    async fn empty_override_is_still_an_override() {
        let client = AgentClient::new("/nonexistent/agent.sock");
        let ctx = ExecContext {
            input_override: Some(String::new()),
            ..ExecContext::default()
        };
        assert_eq!(resolve_input(&client, &ctx).await.unwrap(), "");
    }

    #[tokio::test]
    async fn no_override_falls_through_to_agent() {
        let client = AgentClient::new("/nonexistent/agent.sock");
        let ctx = ExecContext::default();
        assert!(matches!(
            resolve_input(&client, &ctx).await,
            Err(IpcError::NotRunning)
        ));
    }
}
