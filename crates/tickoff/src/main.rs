//! CLI entry point for tickoff.

use std::io;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use time::Date;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use tickoff_app::AppConfig;

mod commands;
mod view;

/// Personal task list with due dates.
#[derive(Parser, Debug)]
#[command(
    name = "tickoff",
    version,
    about = "tickoff: a personal task list stored in a local JSON file"
)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the task file; overrides the configuration.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task.
    Add {
        /// Task text.
        text: String,
        /// Due date as MM/dd/yyyy.
        #[arg(long, value_parser = parse_due)]
        due: Option<Date>,
    },

    /// Change the text or due date of a task. Editing always marks it pending.
    Edit {
        /// Task id or unique id prefix.
        task: String,
        /// New text; keeps the current text when omitted.
        text: Option<String>,
        /// New due date as MM/dd/yyyy.
        #[arg(long, value_parser = parse_due, conflicts_with = "no_due")]
        due: Option<Date>,
        /// Drop the due date.
        #[arg(long)]
        no_due: bool,
    },

    /// Mark a task completed, or pending again.
    Toggle {
        /// Task id or unique id prefix.
        task: String,
    },

    /// Remove a task.
    Rm {
        /// Task id or unique id prefix.
        task: String,
    },

    /// Remove every task.
    Clear,

    /// List tasks.
    Ls {
        /// All, Completed or Pending. Anything else lists all tasks.
        #[arg(long, default_value = "All")]
        filter: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn parse_due(raw: &str) -> Result<Date> {
    tickoff_core::due_date::parse(raw).ok_or_else(|| anyhow!("expected a date as MM/dd/yyyy, got '{raw}'"))
}

fn main() -> Result<()> {
    let Cli {
        config,
        data_dir,
        cmd,
    } = Cli::parse();

    install_tracing();

    let mut config = AppConfig::load(config.as_deref())?;
    if data_dir.is_some() {
        config.storage.data_dir = data_dir;
    }
    let mut store = config.storage.open_store()?;
    tracing::debug!(slot = %config.storage.slot, tasks = store.len(), "Opened task store");
    commands::run(cmd, &mut store, &mut io::stdout().lock())
}

fn install_tracing() {
    // RUST_LOG can raise verbosity; by default only warnings reach stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
