//! `socket` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and start file logging before touching data.
//! - Open the snapshot database and hand the session to the REPL.

mod args;
mod parser;
mod repl;

use anyhow::{Context, Result};
use args::{Cli, Command};
use clap::Parser;
use log::{info, warn};
use socket_core::db::open_db;
use socket_core::{
    default_log_level, init_logging, logging_status, parse_identity_policy, PersonRepository,
    PersonStore, SocketService, SqlitePersonRepository, StorageError,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_file = std::path::absolute(&cli.data_file)
        .with_context(|| format!("invalid data file `{}`", cli.data_file.display()))?;
    let log_dir = resolve_log_dir(cli.log_dir.as_deref(), &data_file)?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy())
        .map_err(anyhow::Error::msg)
        .context("failed to start logging")?;

    let identity = parse_identity_policy(&cli.identity)?;
    let mut conn = open_db(&data_file)
        .with_context(|| format!("failed to open `{}`", data_file.display()))?;
    let (active_level, active_dir) =
        logging_status().context("logging reported ready but has no active state")?;
    info!(
        "event=cli_start module=cli status=ok version={} identity={} log_level={} log_dir={}",
        socket_core::core_version(),
        identity.policy_id(),
        active_level,
        active_dir.display()
    );

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let repo = SqlitePersonRepository::new(&mut conn);
            let store = match SocketService::load_store(&repo, Arc::clone(&identity)) {
                Ok(store) => store,
                Err(err @ StorageError::DataLoad { .. }) if cli.fresh_on_load_error => {
                    warn!(
                        "event=snapshot_load module=cli status=error action=start_empty error={}",
                        err
                    );
                    PersonStore::new(identity)
                }
                Err(err) => {
                    return Err(err).context("failed to load saved persons; rerun with --fresh-on-load-error to start empty");
                }
            };
            let mut service = SocketService::with_store(repo, store);
            repl::run(&mut service, io::stdin().lock(), io::stdout().lock())?;
        }
        Command::Export => {
            let persons = SqlitePersonRepository::new(&mut conn)
                .load_persons()
                .context("failed to load saved persons")?
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&persons)?);
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn resolve_log_dir(explicit: Option<&Path>, data_file: &Path) -> Result<PathBuf> {
    match explicit {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("invalid log directory `{}`", dir.display())),
        None => Ok(data_file
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
            .join("logs")),
    }
}
