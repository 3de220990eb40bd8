//! Activity spinner for blocking archive calls
//!
//! Queries and downloads give no incremental progress, so the terminal
//! shows a single spinner while one is in flight. Without a terminal the
//! spinner is skipped entirely and prompts stay clean for piped input.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Configuration for the activity spinner
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Show the spinner at all
    pub enable_spinner: bool,
    /// Redraw interval
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_spinner: true,
            tick_interval: Duration::from_millis(100),
        }
    }
}

/// Spinner shown while a remote call blocks the session
pub struct ActivitySpinner {
    config: ProgressConfig,
    bar: Option<ProgressBar>,
    is_terminal: bool,
}

impl ActivitySpinner {
    /// Create a spinner; it only draws when stdout is a terminal
    pub fn new(config: ProgressConfig) -> Self {
        let is_terminal = atty::is(atty::Stream::Stdout);
        Self {
            config,
            bar: None,
            is_terminal,
        }
    }

    /// Whether the spinner will be drawn
    pub fn is_enabled(&self) -> bool {
        self.config.enable_spinner && self.is_terminal
    }

    /// Whether a spinner is currently running
    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Start spinning with `message`, replacing any running spinner
    pub fn start(&mut self, message: &str) {
        self.stop();
        if !self.is_enabled() {
            return;
        }

        let style = match ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            Ok(style) => style.tick_strings(&["◐", "◓", "◑", "◒"]),
            Err(e) => {
                debug!("Spinner template error: {}", e);
                return;
            }
        };

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(self.config.tick_interval);
        self.bar = Some(bar);
    }

    /// Stop and erase the spinner
    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ActivitySpinner {
    fn drop(&mut self) {
        self.stop();
    }
}
