//! MAST Fetcher CLI application
//!
//! Command-line interface for finding the latest observation of a MAST
//! proposal and downloading its data products.

use std::process;

use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library (module is public but not re-exported)
use mast_fetcher::cli::{
    handle_config, handle_inspect, handle_session, Cli, Commands, ConfigAction, ConfigArgs,
};
use mast_fetcher::config::AppConfig;
use mast_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // `config init` must work even when the current configuration is broken
    if let Commands::Config(ConfigArgs {
        action: ConfigAction::Init { path },
    }) = &cli.command
    {
        init_logging(&cli, None);
        return handle_config(ConfigAction::Init { path: path.clone() }, None).await;
    }

    let config = AppConfig::load(cli.global.config.clone(), &cli.global.overrides()).await?;

    // Initialize logging based on verbosity
    init_logging(&cli, Some(&config.logging.level));

    info!("MAST Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    // Execute the appropriate command
    match cli.command {
        Commands::Session => {
            info!("Executing session command");
            handle_session(config).await
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            handle_inspect(args, config).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args.action, Some(config)).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
///
/// Flags win over the configured level; `RUST_LOG` directives are kept.
fn init_logging(cli: &Cli, configured_level: Option<&str>) {
    let log_level = cli
        .requested_log_level()
        .or_else(|| configured_level.and_then(|level| level.parse::<Level>().ok()))
        .unwrap_or(Level::WARN);

    // Create environment filter
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("mast_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
