//! Agent query and history subcommands.

use anyhow::{Context, bail};

use cbai_actions::ActionRegistry;
use cbai_history::HistoryStore;
use cbai_ipc::AgentClient;

use crate::runner::{RunOptions, run_action};

pub async fn status() -> anyhow::Result<()> {
    let client = AgentClient::from_env();
    let status = client.status().await?;
    println!("Status: {}", status.status);
    println!("Version: {}", status.version);
    println!("Uptime: {}", status.uptime);
    println!(
        "Last clipboard: {} at {}",
        status.clipboard.kind, status.clipboard.timestamp
    );
    Ok(())
}

pub async fn clipboard() -> anyhow::Result<()> {
    let client = AgentClient::from_env();
    let clipboard = client.clipboard().await?;
    println!("{}", clipboard.text);
    Ok(())
}

pub async fn config() -> anyhow::Result<()> {
    let client = AgentClient::from_env();
    let config = client.config().await?;
    let rendered =
        serde_json::to_string_pretty(&config).context("rendering agent config")?;
    println!("{rendered}");
    Ok(())
}

pub async fn history(limit: usize) -> anyhow::Result<()> {
    let store = HistoryStore::from_env();
    let records = store.read(Some(limit)).await?;
    if records.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {}  {}  {}  {}ms",
            record.id, record.timestamp, record.action, record.status, record.latency_ms
        );
    }
    Ok(())
}

/// Replay a recorded run against its original input text.
pub async fn rerun(
    registry: &ActionRegistry,
    id: &str,
    copy: bool,
    yes: bool,
) -> anyhow::Result<()> {
    let store = HistoryStore::from_env();
    let Some(record) = store.find_by_id(id).await? else {
        bail!("History record not found: {id}");
    };

    run_action(
        registry,
        &record.action,
        RunOptions {
            args: record.args,
            copy,
            yes,
            input_text: Some(record.input),
            trigger: Some(format!("rerun:{id}")),
            replay_of: Some(id.to_owned()),
        },
    )
    .await
}
