//! Download engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::constants::files;

/// Configuration for the download engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory that receives `<collection>/<observation folder>/<file>`
    pub output_root: PathBuf,
    /// Cap on simultaneous transfers (None = one worker per product, all at once)
    pub max_concurrent_downloads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(files::DEFAULT_OUTPUT_ROOT),
            max_concurrent_downloads: None,
        }
    }
}

impl EngineConfig {
    /// Set the output root
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    /// Cap simultaneous transfers; zero means unbounded
    ///
    /// Caps above [`Semaphore::MAX_PERMITS`] are clamped to it.
    pub fn with_max_concurrent_downloads(mut self, limit: usize) -> Self {
        self.max_concurrent_downloads =
            (limit > 0).then_some(limit.min(Semaphore::MAX_PERMITS));
        self
    }
}
