//! Command-line interface components
//!
//! This module contains CLI-specific code for the MAST Fetcher application,
//! including argument parsing, the terminal operator, the activity spinner
//! and the settings banner.

pub mod args;
pub mod commands;
pub mod progress;
pub mod prompt;
pub mod startup;

pub use args::{Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs, InspectArgs};
pub use commands::{build_controller, handle_config, handle_inspect, handle_session};
pub use progress::{ActivitySpinner, ProgressConfig};
pub use prompt::TerminalOperator;
pub use startup::{settings_banner, show_settings};
