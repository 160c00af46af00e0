//! CLI runner for common setup and operations.
//!
//! Encapsulates settings loading, logging initialization and source
//! construction so command handlers stay small.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tileproxy::config::{loader, ConfigFile, ConfigNode};
use tileproxy::http::{HttpClient, ReqwestClient};
use tileproxy::logging::{init_logging, LoggingGuard};
use tileproxy::source::TileSource;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded settings file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading settings and initializing logging.
    ///
    /// `settings_path` overrides the default `~/.tileproxy/config.ini`.
    pub fn new(settings_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match settings_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded settings.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("TileProxy v{}", env!("CARGO_PKG_VERSION"));
        info!("TileProxy CLI: {} command", command);
    }

    /// Source definition path: the command line wins over settings.
    pub fn definition_path(&self, cli_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
        cli_path
            .or_else(|| self.config.proxy.sources.clone())
            .ok_or(CliError::MissingDefinition)
    }

    /// Build a tile source backed by the real HTTP client.
    pub fn load_source(&self, node: &ConfigNode) -> Result<Box<dyn TileSource>, CliError> {
        let client = ReqwestClient::from_settings(&self.config.http).map_err(CliError::HttpClient)?;
        let client: Arc<dyn HttpClient> = Arc::new(client);

        let source = loader::load_source(node, client, &self.config.proxy)?;
        info!(source = source.name(), kind = source.kind(), "source ready");
        Ok(source)
    }
}

/// Read a source definition file.
pub fn read_definition(path: &Path) -> Result<ConfigNode, CliError> {
    Ok(ConfigNode::from_file(path)?)
}
