//! Application state wiring config and the answer service together.

use std::sync::Arc;
use std::time::Duration;

use tsara_infra::config::{load_client_config, resolve_base_url, resolve_data_dir};
use tsara_infra::http::HttpAnswerService;
use tsara_types::config::ClientConfig;

/// Shared state for every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HttpAnswerService>,
    pub config: ClientConfig,
}

impl AppState {
    /// Load config from the data directory and build the HTTP client.
    ///
    /// `base_url_override` comes from `--base-url` or `TSARA_BASE_URL` and
    /// wins over the config file. An invalid URL is fatal here.
    pub async fn init(base_url_override: Option<&str>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_client_config(&data_dir).await;

        let base_url = resolve_base_url(&config, base_url_override)?;
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let service = HttpAnswerService::new(&base_url, timeout)?;

        tracing::debug!(
            base_url = %service.base_url(),
            data_dir = %data_dir.display(),
            "application state initialized"
        );

        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }
}
