mod args;
mod attachment;
mod config;
mod db;
mod error;
mod export;
mod ledger;
mod models;
mod run;
mod summary;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{debug, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};
use crate::config::Config;

fn main() -> ExitCode {
    let args = Args::parse();
    let is_tui = matches!(args.command(), None | Some(Command::Tui));

    let log_file = if is_tui {
        config::data_dir()
            .ok()
            .map(|dir| dir.join(config::LOG_FILE_NAME))
    } else {
        None
    };
    if let Err(e) = init_logger(args.common().log_level(), log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    debug!("Log level set to {}", args.common().log_level());

    match main_inner(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: &Args) -> Result<()> {
    trace!("{args:?}");
    let config_path = match args.common().config() {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;

    let db_path = get_db_path(args.common().db())?;
    let db = db::Database::open(&db_path)?;
    let mut ledger = ledger::Ledger::load(db).context("Failed to load expenses")?;

    match args.command() {
        None | Some(Command::Tui) => run::as_tui(&mut ledger, &config),
        Some(command) => run::as_cli(command, &mut ledger, &config),
    }
}

fn get_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config::data_dir()?.join(config::DB_FILE_NAME)),
    }
}

/// RUST_LOG wins when set; otherwise `level` applies to this crate only.
/// With a log file the output goes there, keeping the terminal clean.
fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
