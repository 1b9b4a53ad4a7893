use clap::{Args, Parser, Subcommand};

use cbai_actions::shared_registry;

mod commands;
mod input;
mod logs;
mod runner;

use runner::{RunOptions, run_action};

#[derive(Debug, Parser)]
#[command(name = "cbai", version, about = "Run AI actions on your clipboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Default, Args)]
struct RunFlags {
    /// Copy the result back to the clipboard
    #[arg(long)]
    copy: bool,

    /// Skip the safe-mode confirmation
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show agent status
    Status,
    /// Print the agent's current clipboard text
    Clipboard,
    /// Print the agent configuration
    Config,
    /// Show agent logs
    Logs {
        /// Number of lines from the end of the log
        #[arg(short = 'n', long, default_value_t = 50)]
        tail: usize,
        /// Show the error log instead
        #[arg(long)]
        err: bool,
    },
    /// List recent action runs
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Replay a recorded run against its original input
    Rerun {
        id: String,
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Run an action by id or alias
    Run {
        action: String,
        args: Vec<String>,
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Summarize the clipboard text
    #[command(visible_aliases = ["summarize", "sum"])]
    Summary {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Explain the clipboard text in simple terms
    Explain {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Translate the clipboard text
    Translate {
        /// Target language (default: English)
        lang: Option<String>,
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Improve the writing of the clipboard text
    Improve {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Extract structured data from the clipboard text
    Extract {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Very brief TL;DR of the clipboard text
    Tldr {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Classify the type of clipboard content
    Classify {
        #[command(flatten)]
        flags: RunFlags,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn dispatch(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Status => commands::status().await,
        Command::Clipboard => commands::clipboard().await,
        Command::Config => commands::config().await,
        Command::Logs { tail, err } => logs::show_logs(tail, err).await,
        Command::History { limit } => commands::history(limit).await,
        Command::Rerun { id, flags } => {
            commands::rerun(shared_registry(), &id, flags.copy, flags.yes).await
        }
        Command::Run {
            action,
            args,
            flags,
        } => run(&action, args, flags).await,
        Command::Summary { flags } => run("summary", vec![], flags).await,
        Command::Explain { flags } => run("explain", vec![], flags).await,
        Command::Translate { lang, flags } => {
            run("translate", lang.into_iter().collect(), flags).await
        }
        Command::Improve { flags } => run("improve", vec![], flags).await,
        Command::Extract { flags } => run("extract", vec![], flags).await,
        Command::Tldr { flags } => run("tldr", vec![], flags).await,
        Command::Classify { flags } => run("classify", vec![], flags).await,
    }
}

async fn run(action: &str, args: Vec<String>, flags: RunFlags) -> anyhow::Result<()> {
    run_action(
        shared_registry(),
        action,
        RunOptions {
            args,
            copy: flags.copy,
            yes: flags.yes,
            ..RunOptions::default()
        },
    )
    .await
}
