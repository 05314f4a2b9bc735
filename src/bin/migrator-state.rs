//! # Migrator State Tool
//!
//! Command-line tool for operators to inspect and repair the migrator
//! checkpoint file, e.g. after a crash left the "sending receipt" flag set.
//!
//! Logs go to stderr; `RUST_LOG` and `MIGRATOR_LOG_FORMAT` apply.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use migrator_core::logging::{init_structured_logging, log_state_operation};
use migrator_core::{MigratorConfig, MigratorError, MigratorState, MilestoneIndex, StateStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "migrator-state")]
#[command(about = "Inspect and manage the migrator checkpoint file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Checkpoint file, overriding the configured path
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the checkpoint and its backup, and validate the checkpoint
    Show,

    /// Write a fresh checkpoint starting at a legacy milestone
    Bootstrap {
        /// Legacy milestone index to start migrating from
        #[arg(short, long)]
        index: MilestoneIndex,
    },

    /// Move the backup checkpoint back into place
    RestoreBackup {
        /// Replace an existing checkpoint
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_structured_logging();

    let config = MigratorConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let store = StateStore::new(cli.state_file.clone().unwrap_or(config.state_file_path));

    match cli.command {
        Commands::Show => show(&store),
        Commands::Bootstrap { index } => bootstrap(&store, index),
        Commands::RestoreBackup { force } => restore_backup(&store, force),
    }
}

fn show(store: &StateStore) -> Result<()> {
    println!("📄 Checkpoint: {}", store.path().display());
    let state = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?;
    println!("{}", serde_json::to_string_pretty(&state)?);

    match store.load_backup() {
        Ok(backup) => {
            println!("🗂️  Backup: {}", store.backup_path().display());
            println!("{}", serde_json::to_string_pretty(&backup)?);
        }
        Err(MigratorError::StateFileNotFound { .. }) => println!("🗂️  No backup present"),
        Err(e) => println!("⚠️  Backup unreadable: {e}"),
    }

    log_state_operation("show", store.path(), Some(&state), "loaded");

    if let Err(e) = state.validate() {
        bail!("checkpoint is not usable: {e}");
    }
    println!("✅ Checkpoint is valid");
    Ok(())
}

fn bootstrap(store: &StateStore, index: MilestoneIndex) -> Result<()> {
    if store.exists()? {
        bail!(MigratorError::StateFileAlreadyExists {
            path: store.path().to_path_buf(),
        });
    }

    let state = MigratorState::bootstrap(index);
    state.validate()?;
    store.persist(&state)?;

    log_state_operation("bootstrap", store.path(), Some(&state), "written");
    println!("✅ Bootstrapped checkpoint at legacy milestone {index}");
    Ok(())
}

fn restore_backup(store: &StateStore, force: bool) -> Result<()> {
    store.restore_backup(force)?;
    let state = store.load()?;

    log_state_operation("restore_backup", store.path(), Some(&state), "restored");
    println!("♻️  Restored {}", store.path().display());
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
