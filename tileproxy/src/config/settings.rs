//! Proxy settings file handling for ~/.tileproxy/config.ini.
//!
//! Missing files and missing keys fall back to defaults.
//!
//! ```ini
//! [http]
//! timeout = 30
//! connect_timeout = 10
//! user_agent = tileproxy/0.1.0
//!
//! [proxy]
//! buffer_capacity = 30000
//! sources = /etc/tileproxy/sources.json
//!
//! [logging]
//! directory = logs
//! file = tileproxy.log
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::source::DEFAULT_BUFFER_CAPACITY;

/// Default upstream request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "tileproxy.log";

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write settings file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout: u64,
    /// Connect timeout in seconds
    pub connect_timeout: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

/// `[proxy]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// Initial output buffer capacity in bytes
    pub buffer_capacity: usize,
    /// Source definition file
    pub sources: Option<PathBuf>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            sources: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Complete settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub http: HttpSettings,
    pub proxy: ProxySettings,
    pub logging: LoggingSettings,
}

fn default_user_agent() -> String {
    format!("tileproxy/{}", env!("CARGO_PKG_VERSION"))
}

impl ConfigFile {
    /// Load settings from the default path (~/.tileproxy/config.ini).
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Builds settings from an already parsed INI document.
    pub fn from_ini(ini: &Ini) -> Result<Self, SettingsError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("http")) {
            if let Some(v) = parse_positive(section, "http", "timeout")? {
                config.http.timeout = v;
            }
            if let Some(v) = parse_positive(section, "http", "connect_timeout")? {
                config.http.connect_timeout = v;
            }
            if let Some(v) = non_empty(section, "user_agent") {
                config.http.user_agent = v.to_string();
            }
        }

        if let Some(section) = ini.section(Some("proxy")) {
            if let Some(v) = parse_positive(section, "proxy", "buffer_capacity")? {
                config.proxy.buffer_capacity = v;
            }
            config.proxy.sources = non_empty(section, "sources").map(expand_tilde);
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(v) = non_empty(section, "directory") {
                config.logging.directory = expand_tilde(v);
            }
            if let Some(v) = non_empty(section, "file") {
                config.logging.file = v.to_string();
            }
        }

        Ok(config)
    }

    /// Save settings to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::WriteError(e.to_string()))?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("http"))
            .set("timeout", self.http.timeout.to_string())
            .set("connect_timeout", self.http.connect_timeout.to_string())
            .set("user_agent", self.http.user_agent.clone());
        let mut proxy = ini.with_section(Some("proxy"));
        proxy.set("buffer_capacity", self.proxy.buffer_capacity.to_string());
        if let Some(sources) = &self.proxy.sources {
            proxy.set("sources", sources.display().to_string());
        }
        ini.with_section(Some("logging"))
            .set("directory", self.logging.directory.display().to_string())
            .set("file", self.logging.file.clone());

        ini.write_to_file(path)
            .map_err(|e| SettingsError::WriteError(e.to_string()))
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive<T>(section: &Properties, name: &str, key: &str) -> Result<Option<T>, SettingsError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = non_empty(section, key) else {
        return Ok(None);
    };

    let invalid = |reason: &str| SettingsError::InvalidValue {
        section: name.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let value: T = raw.parse().map_err(|_| invalid("expected a whole number"))?;
    if value <= T::default() {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Some(value))
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Get the path to the config directory (~/.tileproxy).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tileproxy")
}

/// Get the path to the config file (~/.tileproxy/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, contents).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.http.timeout, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.http.connect_timeout, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert!(config.http.user_agent.starts_with("tileproxy/"));
        assert_eq!(config.proxy.buffer_capacity, 30_000);
        assert!(config.proxy.sources.is_none());
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("nonexistent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_values() {
        let (_dir, path) = write_config(
            "[http]\ntimeout = 5\nconnect_timeout = 2\nuser_agent = test-agent\n\n\
             [proxy]\nbuffer_capacity = 1024\nsources = /etc/tileproxy/sources.json\n\n\
             [logging]\ndirectory = /var/log/tileproxy\nfile = proxy.log\n",
        );

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.http.timeout, 5);
        assert_eq!(config.http.connect_timeout, 2);
        assert_eq!(config.http.user_agent, "test-agent");
        assert_eq!(config.proxy.buffer_capacity, 1024);
        assert_eq!(
            config.proxy.sources,
            Some(PathBuf::from("/etc/tileproxy/sources.json"))
        );
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/tileproxy"));
        assert_eq!(config.logging.file, "proxy.log");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let (_dir, path) = write_config("[http]\ntimeout = 60\n");
        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.http.timeout, 60);
        assert_eq!(config.http.connect_timeout, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.proxy, ProxySettings::default());
    }

    #[test]
    fn test_invalid_number() {
        let (_dir, path) = write_config("[http]\ntimeout = soon\n");
        let err = ConfigFile::load_from(&path).unwrap_err();
        match err {
            SettingsError::InvalidValue {
                section,
                key,
                value,
                ..
            } => {
                assert_eq!(section, "http");
                assert_eq!(key, "timeout");
                assert_eq!(value, "soon");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_rejected() {
        let (_dir, path) = write_config("[proxy]\nbuffer_capacity = 0\n");
        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("must be greater than zero"));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.http.timeout = 12;
        config.proxy.sources = Some(PathBuf::from("/srv/sources.json"));
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".tileproxy/config.ini"));
    }
}
