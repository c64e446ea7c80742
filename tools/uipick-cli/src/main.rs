//! uipick CLI — audit UI trees and replay pick gestures offline.
//!
//! Usage:
//!   uipick audit <TREE>                     Check every target in a tree fixture
//!   uipick validate <TREE> <KEY>            Validate one node by fixture key
//!   uipick replay <TREE> <EVENTS> --kind K  Replay a gesture stream through the capture manager
//!   uipick config                           Show the stored configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uipick_capture_engine::PickerKind;
use uipick_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "uipick",
    about = "Pick, validate, and audit tunable UI targets",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging and per-event decision logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every target-flagged node in a tree fixture
    Audit {
        /// Path to the tree JSON
        tree: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a single node of a tree fixture
    Validate {
        /// Path to the tree JSON
        tree: PathBuf,

        /// Fixture key of the node to validate
        key: String,
    },

    /// Replay a JSONL gesture stream against a tree fixture
    Replay {
        /// Path to the tree JSON
        tree: PathBuf,

        /// Path to the gesture JSONL
        events: PathBuf,

        /// Picker kind to arm: controls, plates, or card
        #[arg(short, long, default_value = "controls")]
        kind: PickerKind,

        /// Write one decision record per event to this JSONL file
        #[arg(long)]
        journal: Option<PathBuf>,
    },

    /// Show the configuration (defaults when no config file exists)
    Config {
        /// Write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let stored = AppConfig::load();
    let mut config = stored.clone();
    if cli.verbose {
        config.logging.level = "debug".to_string();
        config.capture.debug_decisions = true;
    }
    uipick_common::logging::init_logging(&config.logging);
    tracing::debug!(
        path = %uipick_common::config::config_file_path().display(),
        debug_decisions = config.capture.debug_decisions,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Audit { tree, json } => commands::audit::run(tree, json, &config),
        Commands::Validate { tree, key } => commands::validate::run(tree, key, &config),
        Commands::Replay {
            tree,
            events,
            kind,
            journal,
        } => commands::replay::run(tree, events, kind, journal, &config),
        Commands::Config { write } => commands::config::run(write, &stored),
    }
}
