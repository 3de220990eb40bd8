//! Download outcome and report types

use std::path::PathBuf;
use std::time::Duration;

/// Result of one download worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Local path the product was written to
    pub path: PathBuf,
    /// Whether the file exists on disk after the worker finished
    pub success: bool,
    /// Failure description, if any
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub(crate) fn completed(path: PathBuf) -> Self {
        Self {
            path,
            success: true,
            error: None,
        }
    }

    pub(crate) fn failed(path: PathBuf, error: impl ToString) -> Self {
        Self {
            path,
            success: false,
            error: Some(error.to_string()),
        }
    }

    /// Per-file status line shown to the operator
    pub fn status_line(&self) -> String {
        if self.success {
            format!("COMPLETE:  {}", self.path.display())
        } else {
            format!("ERROR: {} failed to download.", self.path.display())
        }
    }
}

/// Aggregate result of a batch download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Number of products requested
    pub requested: usize,
    /// Entry count of the destination directories after the join
    ///
    /// Approximate by construction: pre-existing entries are counted and
    /// colliding file names are counted once.
    pub completed: usize,
    /// One outcome per requested product, in request order
    pub outcomes: Vec<DownloadOutcome>,
    /// Wall-clock time from fan-out to join
    pub elapsed: Duration,
}

impl DownloadReport {
    /// Outcomes whose file is not on disk
    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    /// Number of workers that verified their file
    pub fn verified(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Completion line shown to the operator
    pub fn summary_line(&self) -> String {
        format!(
            "...downloaded {} of {} files in {:.2} sec",
            self.completed,
            self.requested,
            self.elapsed.as_secs_f64()
        )
    }
}
