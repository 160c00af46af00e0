//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use tileproxy::config::{ConfigError, SettingsError};
use tileproxy::http::HttpError;
use tileproxy::source::ProxyError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Settings file could not be loaded
    Settings(SettingsError),
    /// No source definition given on the command line or in settings
    MissingDefinition,
    /// Source definition rejected
    Config(ConfigError),
    /// Failed to create the HTTP client
    HttpClient(HttpError),
    /// Tile could not be resolved or fetched
    Proxy(ProxyError),
    /// Failed to write output file
    FileWrite {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        let help = self.help();
        if !help.is_empty() {
            eprintln!();
            for line in help {
                eprintln!("{}", line);
            }
        }

        process::exit(1)
    }

    /// Additional help printed after the error message.
    fn help(&self) -> &'static [&'static str] {
        match self {
            CliError::MissingDefinition => &[
                "Name the source definition file on the command line:",
                "  tileproxy check <FILE>",
                "  tileproxy urls --source <FILE> ...",
                "  tileproxy fetch --source <FILE> ...",
                "or set it in the settings file:",
                "  [proxy]",
                "  sources = /path/to/sources.json",
            ],
            CliError::Proxy(e) if e.is_not_found() => {
                &["Run `tileproxy check <FILE>` to list the configured maps."]
            }
            _ => &[],
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Settings(e) => write!(f, "Settings error: {}", e),
            CliError::MissingDefinition => write!(f, "No source definition file configured"),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Proxy(e) => write!(f, "Tile request failed ({}): {}", e.status(), e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Settings(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Proxy(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProxyError> for CliError {
    fn from(e: ProxyError) -> Self {
        CliError::Proxy(e)
    }
}
