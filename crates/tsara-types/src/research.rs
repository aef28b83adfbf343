//! Wire types for the answer-generation service.
//!
//! The service accepts `POST /chat` with a [`ChatRequest`] and answers with
//! a [`ResearchResponse`]. Only `summary` is required; every other field may
//! be missing. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::message::{ContactEntity, ResearchDetails};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<ContactEntity>>,
}

impl ResearchResponse {
    /// A response carrying only a summary.
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            topic: None,
            sources: None,
            tools_used: None,
            entities: None,
        }
    }

    /// Split into the reply content and its research details.
    ///
    /// Missing `sources` and `entities` become empty sequences; `topic` and
    /// `tools_used` are carried as given.
    pub fn into_parts(self) -> (String, ResearchDetails) {
        let details = ResearchDetails {
            topic: self.topic,
            tools_used: self.tools_used,
            sources: self.sources.unwrap_or_default(),
            entities: self.entities.unwrap_or_default(),
        };
        (self.summary, details)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Body of `POST /reload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub message: String,
}

/// Error body the service returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
