//! Configuration
//!
//! Two layers of configuration exist:
//!
//! - **Source definitions** ([`ConfigNode`] trees, stored as JSON) describe
//!   the upstream maps, matrices and URL templates. [`loader`] turns them into
//!   tile sources.
//! - **Proxy settings** ([`ConfigFile`], `~/.tileproxy/config.ini`) hold HTTP
//!   client, buffer and logging options.

pub mod loader;
mod node;
mod settings;

pub use node::ConfigNode;
pub use settings::{
    config_directory, config_file_path, ConfigFile, HttpSettings, LoggingSettings, ProxySettings,
    SettingsError, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_DIR,
    DEFAULT_LOG_FILE,
};

use thiserror::Error;

/// Errors raised while loading a source definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Definition file could not be read
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Definition is not a valid configuration tree
    #[error("failed to parse source definition: {0}")]
    Parse(String),

    /// Source element has no name attribute
    #[error("source definition is missing a name")]
    MissingSourceName,

    /// Source type attribute is missing or unknown
    #[error("source {source_name}: unknown source type '{kind}'")]
    UnknownSourceType { source_name: String, kind: String },

    /// A map element has no name attribute
    #[error("{source_name}: missing name in map configuration")]
    MissingMapName { source_name: String },

    /// A matrix element has a missing or non-integer level
    #[error("{source_name}: invalid level '{value}' for matrix in map {map}")]
    InvalidLevel {
        source_name: String,
        map: String,
        value: String,
    },

    /// A matrix element has no http children
    #[error("{source_name}: matrix {level} in map {map} has no <http> request")]
    EmptyMatrix {
        source_name: String,
        map: String,
        level: u32,
    },

    /// An http element failed to parse
    #[error("{context}: failed to parse http: {reason}")]
    Http { context: String, reason: String },

    /// The source defines no maps
    #[error("{source_name}: missing map definitions")]
    NoMaps { source_name: String },

    /// A single-template source has no http element
    #[error("wmts source {source_name} has no <http> request configured")]
    MissingHttp { source_name: String },
}

impl ConfigError {
    /// HTTP status equivalent; configuration problems are all 400.
    pub fn status(&self) -> u16 {
        400
    }
}
