//! Action data model and execution behaviors.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;

use cbai_core::config::AgentConfig;
use cbai_llm::{AiClient, LlmError};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("plugin command failed: {message}")]
    Command { message: String },

    #[error("plugin command I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything an action sees for one run.
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub text: &'a str,
    pub ai: &'a AiClient,
    pub config: &'a AgentConfig,
    pub args: &'a [String],
}

/// How an action produces its output.
///
/// Built-in variants call the provider wrappers directly; `Prompt` and
/// `Command` are the two capabilities plugin files can declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionBehavior {
    Summarize,
    Explain,
    Translate,
    Improve,
    Extract,
    Tldr,
    Classify,
    /// Prompt template sent through the provider. `{text}` and `{args}`
    /// placeholders are substituted before the call.
    Prompt {
        template: String,
        system: Option<String>,
    },
    /// External program: action args appended to `args`, input text on
    /// stdin, trimmed stdout as the result.
    Command {
        program: String,
        args: Vec<String>,
    },
}

impl ActionBehavior {
    /// Execute the behavior against the run context.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call or the plugin command fails.
    pub async fn run(&self, ctx: &ActionContext<'_>) -> Result<String, ActionError> {
        match self {
            Self::Summarize => Ok(ctx.ai.summarize(ctx.text).await?),
            Self::Explain => Ok(ctx.ai.explain(ctx.text).await?),
            Self::Translate => {
                let lang = ctx.args.first().map_or("English", String::as_str);
                Ok(ctx.ai.translate(ctx.text, lang).await?)
            }
            Self::Improve => Ok(ctx.ai.improve(ctx.text).await?),
            Self::Extract => Ok(ctx.ai.extract_data(ctx.text).await?),
            Self::Tldr => {
                let response = ctx
                    .ai
                    .generate(
                        &format!(
                            "Give a very brief TL;DR (1-2 sentences max) of this:\n\n{}",
                            ctx.text
                        ),
                        Some("You provide extremely brief summaries. Be concise."),
                    )
                    .await?;
                Ok(response.content)
            }
            Self::Classify => Ok(ctx.ai.classify(ctx.text).await?),
            Self::Prompt { template, system } => {
                let prompt = render_template(template, ctx);
                let response = ctx.ai.generate(&prompt, system.as_deref()).await?;
                Ok(response.content)
            }
            Self::Command { program, args } => run_command(program, args, ctx).await,
        }
    }
}

fn render_template(template: &str, ctx: &ActionContext<'_>) -> String {
    template
        .replace("{text}", ctx.text)
        .replace("{args}", &ctx.args.join(" "))
}

async fn run_command(
    program: &str,
    args: &[String],
    ctx: &ActionContext<'_>,
) -> Result<String, ActionError> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .args(ctx.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin while output is being collected: writing everything up
    // front deadlocks once the child fills its stdout pipe.
    let stdin = child.stdin.take();
    let text = ctx.text.as_bytes().to_vec();
    let feed = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&text).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), std::io::Error>(())
    };

    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    let output = output?;
    // A child that exits without draining stdin breaks the pipe; its
    // exit status decides the run, not the write.
    if let Err(err) = fed
        && err.kind() != std::io::ErrorKind::BrokenPipe
    {
        return Err(err.into());
    }
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ActionError::Command {
            message: format!("{program} exited with {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_owned())
}

/// A named unit of work: display metadata plus a run behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefinition {
    pub id: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub progress_message: Option<String>,
    pub output_title: String,
    pub behavior: ActionBehavior,
}

impl ActionDefinition {
    /// The id followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
