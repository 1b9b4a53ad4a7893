//! The action run pipeline.
//!
//! Resolve the action, gather input and agent config, enforce the
//! safe-mode gate, execute, and record the attempt. Every attempt that
//! gets past resolution and input leaves a history record, including
//! blocked and failed ones.

use std::time::Instant;

use anyhow::{anyhow, bail};

use cbai_actions::{ActionContext, ActionRegistry};
use cbai_core::safety::StderrPrompt;
use cbai_core::{ExecContext, SafeModeOptions, enforce_safe_mode};
use cbai_history::{HistoryStore, RecordDraft, RunSource, RunStatus};
use cbai_ipc::AgentClient;
use cbai_llm::AiClient;

use crate::input::resolve_input;

/// Per-invocation knobs for one action run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub args: Vec<String>,
    pub copy: bool,
    pub yes: bool,
    /// Explicit input, bypassing both env override and clipboard (rerun).
    pub input_text: Option<String>,
    /// Trigger label override; defaults from the execution context.
    pub trigger: Option<String>,
    /// Id of the history record this run replays.
    pub replay_of: Option<String>,
}

/// Run one action end to end and print its result.
pub async fn run_action(
    registry: &ActionRegistry,
    name: &str,
    opts: RunOptions,
) -> anyhow::Result<()> {
    let Some(action) = registry.resolve(name) else {
        bail!(
            "Unknown action: {name}\nAvailable actions: {}",
            registry.action_ids().join(", ")
        );
    };

    let ctx = ExecContext::from_env();
    let client = AgentClient::from_env();

    let input_fut = async {
        match &opts.input_text {
            Some(text) => Ok(text.clone()),
            None => resolve_input(&client, &ctx).await,
        }
    };
    let (input, config) = tokio::join!(input_fut, client.config());
    let input = input?;
    let config = config?;

    if input.is_empty() {
        bail!("Clipboard is empty");
    }

    let source = if opts.replay_of.is_some() {
        RunSource::Rerun
    } else if ctx.daemon_mode {
        RunSource::Daemon
    } else {
        RunSource::Manual
    };
    let trigger = opts
        .trigger
        .clone()
        .or_else(|| ctx.trigger.clone())
        .unwrap_or_else(|| ctx.default_trigger().to_owned());

    let store = HistoryStore::from_env();
    let mut draft = RecordDraft {
        action: action.id.clone(),
        args: opts.args.clone(),
        source,
        trigger,
        provider: config.provider.label().to_owned(),
        model: config.provider.model.clone(),
        copy: opts.copy,
        input: input.clone(),
        replay_of: opts.replay_of.clone(),
        ..RecordDraft::default()
    };

    let gate = SafeModeOptions {
        yes: opts.yes,
        daemon: ctx.daemon_mode,
    };
    let outcome = execute(action, &config, &input, &opts, gate).await;

    match &outcome {
        RunOutcome::Delivered { output, latency_ms } => {
            draft.latency_ms = *latency_ms;
            draft.output = Some(output.clone());
        }
        RunOutcome::Failed {
            message,
            output,
            latency_ms,
        } => {
            draft.latency_ms = *latency_ms;
            draft.status = RunStatus::Error;
            draft.error = Some(message.clone());
            draft.output = output.clone();
        }
    }
    record(&store, draft).await;

    match outcome {
        RunOutcome::Delivered { .. } => Ok(()),
        RunOutcome::Failed { message, .. } => Err(anyhow!(message)),
    }
}

/// What one attempt came to, after output delivery. The history record
/// is derived from this in exactly one place.
#[derive(Debug)]
enum RunOutcome {
    Delivered {
        output: String,
        latency_ms: u64,
    },
    Failed {
        message: String,
        /// Present when the behavior produced output but delivery failed.
        output: Option<String>,
        latency_ms: u64,
    },
}

/// Stages 3-5: gate, execute, deliver.
async fn execute(
    action: &cbai_actions::ActionDefinition,
    config: &cbai_core::AgentConfig,
    input: &str,
    opts: &RunOptions,
    gate: SafeModeOptions,
) -> RunOutcome {
    if let Err(err) = enforce_safe_mode(config, gate, &StderrPrompt).await {
        return RunOutcome::Failed {
            message: err.to_string(),
            output: None,
            latency_ms: 0,
        };
    }

    let ai = match AiClient::new(&config.provider) {
        Ok(ai) => ai,
        Err(err) => {
            return RunOutcome::Failed {
                message: err.to_string(),
                output: None,
                latency_ms: 0,
            };
        }
    };

    if let Some(message) = &action.progress_message {
        eprintln!("{message}");
    }

    let action_ctx = ActionContext {
        text: input,
        ai: &ai,
        config,
        args: &opts.args,
    };
    let started = Instant::now();
    let result = action.behavior.run(&action_ctx).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(output) => match report(&action.output_title, &output, opts.copy) {
            Ok(()) => RunOutcome::Delivered { output, latency_ms },
            Err(err) => RunOutcome::Failed {
                message: err.to_string(),
                output: Some(output),
                latency_ms,
            },
        },
        Err(err) => RunOutcome::Failed {
            message: err.to_string(),
            output: None,
            latency_ms,
        },
    }
}

/// Append the record; a history write failure must not fail the run.
async fn record(store: &HistoryStore, draft: RecordDraft) {
    if let Err(err) = store.append(draft).await {
        tracing::warn!(path = %store.path().display(), error = %err, "history write failed");
    }
}

fn report(title: &str, output: &str, copy: bool) -> anyhow::Result<()> {
    println!("{title}:");
    println!("{}", "─".repeat(title.chars().count() + 1));
    println!("{output}");

    if copy {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| anyhow!("clipboard unavailable: {e}"))?;
        clipboard
            .set_text(output.to_owned())
            .map_err(|e| anyhow!("clipboard write failed: {e}"))?;
        println!("\n(Copied to clipboard)");
    }
    Ok(())
}
