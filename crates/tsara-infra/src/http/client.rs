//! HttpAnswerService -- concrete [`AnswerService`] over the service's JSON API.
//!
//! Endpoints:
//! - `POST {base}/chat` with `{"message": ...}` returns a research response
//! - `GET {base}/health` returns readiness
//! - `POST {base}/reload` rebuilds the service's document index
//!
//! Any non-2xx status is a failure. The service attaches `{"detail": ...}`
//! to its error responses, which is kept for the fallback reply.

use std::time::Duration;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use tsara_core::answer::AnswerService;
use tsara_types::error::{ConfigError, DispatchError};
use tsara_types::research::{
    ChatRequest, ErrorBody, HealthResponse, ReloadResponse, ResearchResponse,
};

/// Answer service reached over HTTP.
pub struct HttpAnswerService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerService {
    /// Create a client for the service at `base_url`.
    ///
    /// With `timeout` unset, requests wait as long as the service takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AnswerService for HttpAnswerService {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn ask(&self, message: &str) -> Result<ResearchResponse, DispatchError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let url = self.url("/chat");
        debug!(url = %url, "POST chat");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn health(&self) -> Result<HealthResponse, DispatchError> {
        let url = self.url("/health");
        debug!(url = %url, "GET health");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn reload(&self) -> Result<ReloadResponse, DispatchError> {
        let url = self.url("/reload");
        debug!(url = %url, "POST reload");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

/// Validate a base URL and strip any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn transport_error(err: reqwest::Error) -> DispatchError {
    DispatchError::Transport(err.to_string())
}

/// Map a response to `T`, treating non-2xx and unreadable bodies as failures.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DispatchError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|b| b.detail);
        debug!(status = status.as_u16(), body = %body, "answer service error status");
        return Err(DispatchError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| DispatchError::MalformedBody(e.to_string()))
}
