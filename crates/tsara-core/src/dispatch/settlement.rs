//! Settlement types and the success/failure reply mappings.

use std::fmt;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use tsara_types::error::DispatchError;
use tsara_types::message::ConversationMessage;
use tsara_types::research::ResearchResponse;

/// Identifier for one dispatched request (UUIDv7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question accepted by the controller and handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub request_id: RequestId,
    /// Session the question was asked in.
    pub session_id: Uuid,
    pub query: String,
}

/// The single terminal event of one dispatched request.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub request_id: RequestId,
    pub session_id: Uuid,
    /// Assistant message built from the success or failure mapping.
    pub reply: ConversationMessage,
    /// The underlying failure, if the call did not succeed.
    pub error: Option<DispatchError>,
    /// Wall time between issuing the call and its settlement.
    pub elapsed: Duration,
}

impl Settlement {
    /// Build the settlement for a finished call.
    pub fn from_outcome(
        request: &DispatchRequest,
        outcome: Result<ResearchResponse, DispatchError>,
        elapsed: Duration,
    ) -> Self {
        let (reply, error) = match outcome {
            Ok(response) => (success_reply(response), None),
            Err(err) => (failure_reply(&err), Some(err)),
        };

        Self {
            request_id: request.request_id,
            session_id: request.session_id,
            reply,
            error,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Success mapping: `content = summary`, research fields carried over.
pub fn success_reply(response: ResearchResponse) -> ConversationMessage {
    let (summary, details) = response.into_parts();
    ConversationMessage::assistant(summary, Some(details))
}

/// Failure mapping: fallback content and no research fields.
pub fn failure_reply(err: &DispatchError) -> ConversationMessage {
    warn!(error = %err, "answer request failed, substituting fallback reply");
    ConversationMessage::assistant(err.fallback_content(), None)
}
