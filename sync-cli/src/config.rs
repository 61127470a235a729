//! Configuration loading for todo-sync.
//!
//! Configuration is loaded from an optional TOML file. Every key has a
//! default, so an empty file (or none at all) is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use todo_sync_client::SyncConfig;
use todo_sync_types::DeviceRole;

/// Root configuration for todo-sync.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Device configuration.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Sync timing configuration.
    #[serde(default)]
    pub sync: SyncTimings,
}

/// Device configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceConfig {
    /// Which side of the pair this process acts as (default: primary).
    #[serde(default)]
    pub role: DeviceRole,
    /// Directory for list files (default: platform data directory).
    pub data_dir: Option<PathBuf>,
}

/// Sync timing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTimings {
    /// Debounce window in milliseconds (default: 500).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Delay before the startup peer request in milliseconds (default: 1000).
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
    /// Peer request timeout in milliseconds (default: 5000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// Default value functions
fn default_debounce_ms() -> u64 {
    500
}

fn default_startup_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl Default for SyncTimings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            startup_delay_ms: default_startup_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Build the manager configuration for `role` rooted at `data_dir`.
    pub fn sync_config(&self, role: DeviceRole, data_dir: &Path) -> SyncConfig {
        SyncConfig::new(role, data_dir)
            .with_debounce(Duration::from_millis(self.sync.debounce_ms))
            .with_startup_delay(Duration::from_millis(self.sync.startup_delay_ms))
            .with_request_timeout(Duration::from_millis(self.sync.request_timeout_ms))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.device.role, DeviceRole::Primary);
        assert!(config.device.data_dir.is_none());
        assert_eq!(config.sync.debounce_ms, 500);
        assert_eq!(config.sync.startup_delay_ms, 1000);
        assert_eq!(config.sync.request_timeout_ms, 5000);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[device]
role = "companion"
data_dir = "/data/todos"

[sync]
debounce_ms = 250
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.role, DeviceRole::Companion);
        assert_eq!(config.device.data_dir, Some(PathBuf::from("/data/todos")));
        assert_eq!(config.sync.debounce_ms, 250);
        assert_eq!(config.sync.startup_delay_ms, 1000);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.device.role, DeviceRole::Primary);
        assert_eq!(config.sync.request_timeout_ms, 5000);
    }

    #[test]
    fn sync_config_carries_timings() {
        let config: Config = toml::from_str("[sync]\nstartup_delay_ms = 50").unwrap();
        let sync = config.sync_config(DeviceRole::Companion, Path::new("/d"));

        assert_eq!(sync.startup_delay, Duration::from_millis(50));
        assert_eq!(sync.debounce, Duration::from_millis(500));
        assert_eq!(sync.blob_path(), PathBuf::from("/d/watch_todos.json"));
    }

    #[test]
    fn unknown_role_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo-sync.toml");
        std::fs::write(&path, "[device]\nrole = \"tablet\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = Config::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
