//! presubmit CLI tool.
//!
//! Usage:
//! ```bash
//! presubmit check [OPTIONS] [PATHS]...
//! presubmit list-checks
//! presubmit init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Source-tree hygiene checks for changes under review
#[derive(Parser)]
#[command(name = "presubmit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run presubmit checks
    Check {
        /// Changed files to check (default: every file under the root)
        paths: Vec<PathBuf>,

        /// Repository root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// BUG field of the change, e.g. "webrtc:1234,chromium:5678"
        #[arg(long, env = "PRESUBMIT_BUG")]
        bug: Option<String>,

        /// Read the BUG field from a commit message file
        #[arg(long, conflicts_with = "bug")]
        commit_message: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific checks (comma-separated names or codes)
        #[arg(long)]
        checks: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available checks
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
    /// Rich terminal rendering.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            root,
            bug,
            commit_message,
            format,
            checks,
            exclude,
        } => {
            let args = commands::check::CheckArgs {
                root,
                config: cli.config,
                paths,
                bug,
                commit_message,
                format,
                checks,
                exclude,
            };
            commands::check::run(args)
        }
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
