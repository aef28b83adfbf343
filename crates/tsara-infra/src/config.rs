//! Client configuration loader for Tsara.
//!
//! Reads `config.toml` from the data directory (`~/.tsara/` by default) and
//! deserializes it into [`ClientConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use tsara_types::config::ClientConfig;
use tsara_types::error::ConfigError;

use crate::http::normalize_base_url;

pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `TSARA_HOME` environment variable
/// 2. `~/.tsara`
/// 3. `.tsara` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TSARA_HOME") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".tsara");
    }

    PathBuf::from(".tsara")
}

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    match read_client_config(&config_path).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            ClientConfig::default()
        }
        Err(err) => {
            tracing::warn!("{}: {err}, using defaults", config_path.display());
            ClientConfig::default()
        }
    }
}

/// Read and parse a config file. `Ok(None)` when the file does not exist.
pub async fn read_client_config(path: &Path) -> Result<Option<ClientConfig>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigError::Read(err.to_string())),
    };
    parse_client_config(&content).map(Some)
}

pub fn parse_client_config(content: &str) -> Result<ClientConfig, ConfigError> {
    toml::from_str::<ClientConfig>(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Resolve the base URL to use.
///
/// An explicit override (CLI flag or `TSARA_BASE_URL`) wins over the config
/// file. The result is validated and has no trailing slash.
pub fn resolve_base_url(
    config: &ClientConfig,
    override_url: Option<&str>,
) -> Result<String, ConfigError> {
    let raw = override_url
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(config.base_url.as_str());
    normalize_base_url(raw)
}
