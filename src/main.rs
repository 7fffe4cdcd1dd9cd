use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use ged::config::Config;
use ged::editor::Editor;
use ged::logging;
use ged::terminal::Terminal;

#[derive(Parser)]
#[command(name = "ged", version)]
#[command(about = "A small line editor with one window per file", long_about = None)]
struct Cli {
    /// Files to open, one window each. Missing files start empty.
    files: Vec<PathBuf>,

    /// Config file (default: <config dir>/ged/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "ged::session=trace"
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.or_else(Config::default_path) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    logging::init(&config)?;

    if !termion::is_tty(&io::stdin()) || !termion::is_tty(&io::stdout()) {
        bail!("ged must be run from a terminal");
    }

    info!(files = cli.files.len(), "ged starting");

    let mut editor = Editor::new(Terminal::new(config.history_size), &config);
    editor
        .open_paths(cli.files.as_slice())
        .context("could not create windows")?;
    editor.run()?;

    info!("last window closed");
    Ok(())
}
