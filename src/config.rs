//! Configuration management for MAST Fetcher
//!
//! This module provides unified configuration management with multi-source
//! loading (defaults, TOML file, environment, command line) and zero-config
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::app::{ClientConfig, EngineConfig, SessionConfig};
use crate::constants::{env as env_keys, files, limits, mast};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Archive selection
    pub archive: ArchiveConfigToml,
    /// Session limits
    pub session: SessionConfigToml,
    /// Download settings
    pub download: DownloadConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfigToml {
    /// Collection (telescope/mission) to search
    pub telescope: String,
    /// Archive server host
    pub server: String,
    /// Use HTTPS
    pub use_tls: bool,
}

impl Default for ArchiveConfigToml {
    fn default() -> Self {
        Self {
            telescope: mast::DEFAULT_TELESCOPE.to_string(),
            server: mast::DEFAULT_SERVER.to_string(),
            use_tls: true,
        }
    }
}

/// TOML-friendly session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfigToml {
    /// Largest count-query result accepted
    pub max_results: u64,
    /// Rows requested from the products service
    pub product_page_size: u32,
}

impl Default for SessionConfigToml {
    fn default() -> Self {
        Self {
            max_results: limits::DEFAULT_MAX_RESULTS,
            product_page_size: limits::PRODUCT_PAGE_SIZE,
        }
    }
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Root directory for downloaded products
    pub output_root: PathBuf,
    /// Cap on simultaneous transfers (0 = unbounded)
    pub max_concurrent_downloads: usize,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(files::DEFAULT_OUTPUT_ROOT),
            max_concurrent_downloads: 0,
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connect timeout in seconds (None = no timeout)
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_nodelay: true,
            connect_timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Command-line overrides applied on top of file and environment settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub telescope: Option<String>,
    pub server: Option<String>,
    pub output_root: Option<PathBuf>,
    pub max_results: Option<u64>,
    pub max_concurrent_downloads: Option<usize>,
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, SessionConfig, EngineConfig) {
        let client = ClientConfig {
            server: self.archive.server.clone(),
            use_tls: self.archive.use_tls,
            tcp_nodelay: self.client.tcp_nodelay,
            connect_timeout: self.client.connect_timeout_secs.map(Duration::from_secs),
        };

        let session = SessionConfig {
            telescope: self.archive.telescope.clone(),
            max_results: self.session.max_results,
            product_page_size: self.session.product_page_size,
        };

        let engine = EngineConfig::default()
            .with_output_root(self.download.output_root.clone())
            .with_max_concurrent_downloads(self.download.max_concurrent_downloads);

        (client, session, engine)
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    /// 4. CLI arguments
    pub async fn load(
        config_file_override: Option<PathBuf>,
        overrides: &ConfigOverrides,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            debug!("Loading config from: {}", path.display());
            config = Self::load_from_file(&path).await?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(telescope) = lookup(env_keys::TELESCOPE) {
            self.archive.telescope = telescope;
        }
        if let Some(server) = lookup(env_keys::SERVER) {
            self.archive.server = server;
        }
        if let Some(output) = lookup(env_keys::OUTPUT_DIR) {
            self.download.output_root = PathBuf::from(output);
        }
        if let Some(raw) = lookup(env_keys::MAX_RESULTS) {
            self.session.max_results =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: env_keys::MAX_RESULTS.to_string(),
                        value: raw.clone(),
                        reason: "Expected a positive integer".to_string(),
                    })?;
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(telescope) = &overrides.telescope {
            self.archive.telescope = telescope.clone();
        }
        if let Some(server) = &overrides.server {
            self.archive.server = server.clone();
        }
        if let Some(output_root) = &overrides.output_root {
            self.download.output_root = output_root.clone();
        }
        if let Some(max_results) = overrides.max_results {
            self.session.max_results = max_results;
        }
        if let Some(limit) = overrides.max_concurrent_downloads {
            self.download.max_concurrent_downloads = limit;
        }
    }

    /// Reject values the session cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, value: String, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
            reason: reason.to_string(),
        };

        if self.archive.telescope.trim().is_empty() {
            return Err(invalid(
                "archive.telescope",
                self.archive.telescope.clone(),
                "Telescope must not be empty",
            ));
        }
        if self.archive.server.trim().is_empty() {
            return Err(invalid(
                "archive.server",
                self.archive.server.clone(),
                "Server must not be empty",
            ));
        }
        if self.session.max_results == 0 {
            return Err(invalid(
                "session.max_results",
                "0".to_string(),
                "At least one result must be accepted",
            ));
        }
        if self.session.product_page_size == 0 {
            return Err(invalid(
                "session.product_page_size",
                "0".to_string(),
                "Page size must be greater than 0",
            ));
        }
        if self.download.max_concurrent_downloads > Semaphore::MAX_PERMITS {
            return Err(invalid(
                "download.max_concurrent_downloads",
                self.download.max_concurrent_downloads.to_string(),
                "Too many concurrent downloads",
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the commented default configuration file
    ///
    /// Returns the path written, or `None` if a file already exists there.
    pub async fn initialize(path: Option<PathBuf>) -> ConfigResult<Option<PathBuf>> {
        let config_path = match path {
            Some(path) => path,
            None => Self::get_default_config_path()?,
        };

        if config_path.exists() {
            return Ok(None);
        }

        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        Ok(Some(config_path))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::LOCAL_CONFIG_FILE)];
        if let Ok(user_config) = Self::get_default_config_path() {
            search_paths.push(user_config);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# MAST Fetcher Configuration
# You can customize any of these settings to suit your needs.

[archive]
# Collection searched for every proposal (e.g. "JWST", "HST")
telescope = "{}"
# Archive server host
server = "{}"
use_tls = true

[session]
# Count-query results above this bound are refused
max_results = {}
# Products listed per observation (only the first page is fetched)
product_page_size = {}

[download]
# Files land in <output_root>/<collection>/<observation folder>/
output_root = "{}"
# Simultaneous transfers (0 = one worker per file, all at once)
max_concurrent_downloads = 0

[client]
tcp_nodelay = true
# connect_timeout_secs = 30  # Uncomment to bound connection setup

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            mast::DEFAULT_TELESCOPE,
            mast::DEFAULT_SERVER,
            limits::DEFAULT_MAX_RESULTS,
            limits::PRODUCT_PAGE_SIZE,
            files::DEFAULT_OUTPUT_ROOT,
        )
    }
}
