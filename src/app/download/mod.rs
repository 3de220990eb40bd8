//! Download Engine
//!
//! Fetches every product of an observation concurrently. Each product gets
//! its own worker task; all workers are spawned together and joined
//! together. Workers share nothing but the output directory tree, so the
//! only coordination is idempotent directory creation.
//!
//! The completed count is taken after the join by listing the destination
//! directories, not by counting worker acknowledgements.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mast_fetcher::app::{DownloadEngine, EngineConfig, MastClient, ProductRecord};
//!
//! # async fn example(products: Vec<ProductRecord>) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(MastClient::new()?);
//! let engine = DownloadEngine::new(client, EngineConfig::default());
//! let report = engine.download_all(&products).await;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod types;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::app::client::ArchiveService;
use crate::app::models::ProductRecord;
use crate::errors::{DownloadError, DownloadResult};

pub use config::EngineConfig;
pub use types::{DownloadOutcome, DownloadReport};

/// Concurrent fan-out downloader
pub struct DownloadEngine {
    service: Arc<dyn ArchiveService>,
    config: EngineConfig,
}

impl DownloadEngine {
    /// Create an engine writing under `config.output_root`
    pub fn new(service: Arc<dyn ArchiveService>, config: EngineConfig) -> Self {
        Self { service, config }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Download every product and wait for all workers to finish
    ///
    /// Never fails as a whole: per-file problems are recorded in the
    /// returned outcomes and reflected in the completed count.
    pub async fn download_all(&self, products: &[ProductRecord]) -> DownloadReport {
        let start = Instant::now();
        let root = self.config.output_root.clone();
        let limiter = self
            .config
            .max_concurrent_downloads
            .map(|limit| Arc::new(Semaphore::new(limit.min(Semaphore::MAX_PERMITS))));

        let destination_dirs: BTreeSet<PathBuf> = products
            .iter()
            .map(|p| p.destination_dir(&root))
            .collect();

        let mut paths = Vec::with_capacity(products.len());
        let mut handles = Vec::with_capacity(products.len());

        for product in products {
            let path = product.destination_path(&root);
            paths.push(path.clone());

            let service = Arc::clone(&self.service);
            let limiter = limiter.clone();
            let dir = product.destination_dir(&root);
            let uri = product.data_uri.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                download_single_file(service.as_ref(), &uri, &dir, &path).await
            }));
        }

        info!("...all download workers launched ({})", handles.len());

        let results = join_all(handles).await;

        let outcomes: Vec<DownloadOutcome> = results
            .into_iter()
            .zip(paths)
            .map(|(joined, path)| match joined {
                Ok(Ok(())) => DownloadOutcome::completed(path),
                Ok(Err(e)) => {
                    warn!("Download failed for {}: {}", path.display(), e);
                    DownloadOutcome::failed(path, e)
                }
                Err(e) => {
                    let error = DownloadError::WorkerFailed {
                        reason: e.to_string(),
                    };
                    warn!("Download worker for {} failed: {}", path.display(), error);
                    DownloadOutcome::failed(path, error)
                }
            })
            .collect();

        let mut completed = 0;
        for dir in &destination_dirs {
            completed += count_entries(dir).await;
        }

        let report = DownloadReport {
            requested: products.len(),
            completed,
            outcomes,
            elapsed: start.elapsed(),
        };

        info!(
            "Download batch finished: {} of {} files present ({} verified by workers)",
            report.completed,
            report.requested,
            report.verified()
        );

        report
    }
}

/// Fetch one product and write it to `path`
///
/// Creates `dir` if missing; concurrent creation by sibling workers is not
/// an error.
pub async fn download_single_file(
    service: &dyn ArchiveService,
    uri: &str,
    dir: &Path,
    path: &Path,
) -> DownloadResult<()> {
    let content = service.fetch_file(uri).await?;

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, &content).await?;

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {
            debug!("Wrote {} bytes to {}", content.len(), path.display());
            Ok(())
        }
        _ => Err(DownloadError::MissingAfterWrite {
            path: path.to_path_buf(),
        }),
    }
}

/// Number of entries in a directory (zero if it does not exist)
async fn count_entries(dir: &Path) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            return 0;
        }
    };

    let mut count = 0;
    while let Ok(Some(_)) = entries.next_entry().await {
        count += 1;
    }
    count
}
