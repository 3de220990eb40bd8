//! Command handlers for MAST Fetcher CLI
//!
//! This module implements the command handlers that wire CLI arguments and
//! configuration into the core application: the interactive session, the
//! one-shot inspection and configuration management.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::{
    count_observations, fetch_observations, select_latest, summarize_products, ArchiveService,
    DownloadEngine, MastClient, ObservationSummary, ProposalId, SessionController,
};
use crate::cli::progress::{ActivitySpinner, ProgressConfig};
use crate::cli::prompt::TerminalOperator;
use crate::cli::startup::show_settings;
use crate::cli::{ConfigAction, InspectArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, ProductError, QueryError, Result};

/// Build the archive client and session controller from configuration
pub fn build_controller(config: &AppConfig) -> Result<SessionController> {
    let (client_config, session_config, engine_config) = config.to_runtime_config();

    let client = MastClient::with_config(client_config)?;
    info!("Using archive at {}", client.base_url());

    let service: Arc<dyn ArchiveService> = Arc::new(client);
    let engine = DownloadEngine::new(Arc::clone(&service), engine_config);
    Ok(SessionController::new(service, engine, session_config))
}

/// Handle the session command
///
/// Prints the settings banner and runs the interactive session on
/// stdin/stdout until the operator quits.
pub async fn handle_session(config: AppConfig) -> Result<()> {
    let controller = build_controller(&config)?;
    show_settings(&config);

    let mut operator = TerminalOperator::stdio();
    let summary = controller.run(&mut operator).await?;

    debug!(
        "Session checked {} proposals, restarted {} times, ran {} downloads",
        summary.proposals_checked,
        summary.restarts,
        summary.downloads.len()
    );
    Ok(())
}

/// Handle the inspect command
///
/// Runs count, selection and product resolution for one proposal and
/// prints the results without downloading anything.
pub async fn handle_inspect(args: InspectArgs, config: AppConfig) -> Result<()> {
    let proposal_id = match ProposalId::parse(&args.proposal_id) {
        Ok(id) => id,
        Err(QueryError::QuitRequested) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let (client_config, session_config, _) = config.to_runtime_config();
    let client = MastClient::with_config(client_config)?;
    let telescope = session_config.telescope.as_str();
    let mut spinner = ActivitySpinner::new(ProgressConfig::default());

    spinner.start(&format!("Counting observations for {}...", proposal_id));
    let count = count_observations(&client, telescope, &proposal_id).await;
    spinner.stop();
    let count = match count {
        Ok(count) => count,
        Err(QueryError::EmptyCount) => 0,
        Err(e) => return Err(e.into()),
    };

    if count == 0 {
        println!("No files found for proposal {}.", proposal_id);
        return Ok(());
    }
    if !session_config.accepts_count(count) {
        println!(
            "Too many results returned for proposal {} ({} observations).",
            proposal_id, count
        );
        return Ok(());
    }
    println!("Found {} observations for {}.", count, proposal_id);

    spinner.start(&format!("Fetching observations for {}...", proposal_id));
    let records = fetch_observations(&client, telescope, &proposal_id).await;
    spinner.stop();
    let records = records?;

    let latest = match select_latest(&records) {
        Ok(latest) => latest,
        Err(e) => {
            info!("Proposal {}: {}", proposal_id, e);
            println!(
                "Data entries do not contain timing information!  (could be planned observations)"
            );
            return Ok(());
        }
    };
    for line in ObservationSummary::from_record(latest).lines() {
        println!("{}", line);
    }

    spinner.start(&format!("Listing products of {}...", latest.obsid));
    let products =
        summarize_products(&client, &latest.obsid, session_config.product_page_size).await;
    spinner.stop();

    match products {
        Ok(products) => println!("{}", products.summary_line()),
        Err(ProductError::SizeOverflow { .. }) => println!("Total file size too large!"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Handle the config command
pub async fn handle_config(action: ConfigAction, config: Option<AppConfig>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = config.ok_or_else(|| AppError::generic("No configuration loaded"))?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { path } => init_config(path).await,
    }
}

async fn init_config(path: Option<PathBuf>) -> Result<()> {
    match AppConfig::initialize(path.clone()).await? {
        Some(written) => println!("Created configuration file: {}", written.display()),
        None => {
            let existing = match path {
                Some(path) => path,
                None => AppConfig::get_default_config_path()?,
            };
            println!(
                "Configuration file already exists: {}",
                existing.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_controller_from_defaults() {
        let controller = build_controller(&AppConfig::default()).unwrap();
        assert_eq!(controller.config().telescope, "JWST");
        assert_eq!(controller.config().max_results, 50_000);
    }

    #[tokio::test]
    async fn test_inspect_rejects_non_integer() {
        let args = InspectArgs {
            proposal_id: "abc".to_string(),
        };
        let result = handle_inspect(args, AppConfig::default()).await;
        assert!(matches!(
            result,
            Err(AppError::Query(QueryError::InvalidProposalId { .. }))
        ));
    }

    #[tokio::test]
    async fn test_config_init_into_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        handle_config(ConfigAction::Init { path: Some(path.clone()) }, None)
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_config_show_requires_loaded_config() {
        assert!(handle_config(ConfigAction::Show, None).await.is_err());
        assert!(handle_config(ConfigAction::Show, Some(AppConfig::default()))
            .await
            .is_ok());
    }
}
