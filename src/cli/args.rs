//! Command-line argument parsing for MAST Fetcher
//!
//! This module defines the CLI structure using clap derive macros:
//! the interactive session, a one-shot proposal inspection and
//! configuration management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

/// MAST Fetcher - Download the latest observation of a proposal
#[derive(Parser, Debug)]
#[command(
    name = "mast_fetcher",
    version,
    about = "Find and download the latest observation of a MAST proposal",
    long_about = "An interactive tool for the Mikulski Archive for Space Telescopes.
Counts the observations of a proposal, summarizes the most recent one and downloads its data products concurrently."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Collection to search (e.g. "JWST", "HST")
    #[arg(long, global = true)]
    pub telescope: Option<String>,

    /// Archive server host
    #[arg(long, global = true, value_name = "HOST")]
    pub server: Option<String>,

    /// Root directory for downloaded files
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Largest observation count accepted for inspection
    #[arg(long, global = true)]
    pub max_results: Option<u64>,

    /// Cap on simultaneous file transfers (0 = unbounded)
    #[arg(long, global = true)]
    pub max_concurrent_downloads: Option<usize>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive proposal session
    Session,

    /// Summarize the latest observation of one proposal without downloading
    Inspect(InspectArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Proposal identifier (integer)
    #[arg(value_name = "PROPOSAL_ID")]
    pub proposal_id: String,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a commented default configuration file
    Init {
        /// Destination path (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested by flags, if any
    pub fn requested_log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        self.requested_log_level().unwrap_or(tracing::Level::WARN)
    }
}

impl GlobalArgs {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            telescope: self.telescope.clone(),
            server: self.server.clone(),
            output_root: self.output_dir.clone(),
            max_results: self.max_results,
            max_concurrent_downloads: self.max_concurrent_downloads,
        }
    }
}
