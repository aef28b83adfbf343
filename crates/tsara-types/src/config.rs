//! Client configuration types for Tsara.
//!
//! `ClientConfig` mirrors the optional `config.toml` in the data directory.
//! All fields have defaults, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Address of a locally running answer service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Top-level configuration for the Tsara client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the answer service; `/chat` is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Print elapsed time after each reply.
    #[serde(default = "default_show_timing")]
    pub show_timing: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_show_timing() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            show_timing: default_show_timing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert!(config.request_timeout_secs.is_none());
        assert!(config.show_timing);
    }

    #[test]
    fn test_client_config_deserialize_with_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "https://answers.example.org"
request_timeout_secs = 90
show_timing = false
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://answers.example.org");
        assert_eq!(config.request_timeout_secs, Some(90));
        assert!(!config.show_timing);
    }
}
