use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use time::{Date, OffsetDateTime};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{ConfigLoader, CONFIG_ENV, DATA_ENV};
use crate::storage;

pub mod commands;

use self::commands::{
    CalendarArgs, DeleteArgs, ExportArgs, ListArgs, ShowArgs, StatsArgs, WriteArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "moodjournal",
    version,
    about = "Daily mood journal with streaks, mood breakdowns and a month calendar"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over MOODJOURNAL_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory (takes precedence over MOODJOURNAL_DATA)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write (or rewrite) the entry for a day
    Write(WriteArgs),
    /// Print the entry for a day
    Show(ShowArgs),
    /// Delete the entry for a day
    Delete(DeleteArgs),
    /// List entries, optionally filtered by text and mood
    List(ListArgs),
    /// Streaks, missed days, mood breakdowns and word counts (default)
    Stats(StatsArgs),
    /// Month calendar with a mood glyph on each journaled day
    Calendar(CalendarArgs),
    /// Export a date range to Markdown or JSON
    Export(ExportArgs),
    /// Print the mood lexicon grouped by category
    Moods,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }
    if let Some(path) = &cli.data_dir {
        env::set_var(DATA_ENV, path);
    }

    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let loader = ConfigLoader::discover()?;
    let paths = loader.paths().clone();
    let config = loader.load_or_init()?;
    let storage = storage::init(&paths, &config.storage)?;

    let today = local_today();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Stats(StatsArgs::default()));
    let output = match command {
        Commands::Write(args) => commands::write_entry(&storage, args, today)?,
        Commands::Show(args) => commands::show_entry(&storage, &args)?,
        Commands::Delete(args) => commands::delete_entry(&storage, &args)?,
        Commands::List(args) => commands::list_entries(&storage, &args)?,
        Commands::Stats(args) => commands::stats(&storage, &config, &args, today)?,
        Commands::Calendar(args) => commands::calendar(&storage, &config, &args, today)?,
        Commands::Export(args) => commands::export(&storage, &config, &paths, &args, today)?,
        Commands::Moods => commands::moods(),
    };
    print!("{output}");
    Ok(())
}

/// Today's date in the local timezone, or UTC when the offset is unavailable.
pub fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))
    })
    .map(|_| ())
}
