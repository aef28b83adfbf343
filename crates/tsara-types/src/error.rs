use thiserror::Error;

/// Reply content used when a failure carries no usable message.
pub const GENERIC_FALLBACK: &str = "Something went wrong. Please try again.";

/// Errors from a single call to the answer service.
///
/// Every variant is recovered locally into a fallback assistant reply; none
/// of them ends the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("could not reach the answer service: {0}")]
    Transport(String),

    #[error("the answer service responded with HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("the answer service sent a reply that could not be read: {0}")]
    MalformedBody(String),
}

impl DispatchError {
    /// Human-readable text shown in place of a reply.
    ///
    /// Uses the `detail` the service attached to an error status, or the
    /// message carried by a transport or body failure. Falls back to
    /// [`GENERIC_FALLBACK`] when that text is blank. A status error without
    /// detail reports its status code.
    pub fn fallback_content(&self) -> String {
        let message = match self {
            DispatchError::Transport(message) | DispatchError::MalformedBody(message) => {
                message.as_str()
            }
            DispatchError::Status {
                detail: Some(detail),
                ..
            } => detail.as_str(),
            DispatchError::Status { detail: None, .. } => return self.to_string(),
        };

        if message.trim().is_empty() {
            GENERIC_FALLBACK.to_string()
        } else {
            message.to_string()
        }
    }
}

/// Errors from loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::Transport("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "could not reach the answer service: connection refused"
        );

        let err = DispatchError::Status {
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "the answer service responded with HTTP 502");
    }

    #[test]
    fn test_fallback_prefers_service_detail() {
        let err = DispatchError::Status {
            status: 500,
            detail: Some("System RAG not initialized".to_string()),
        };
        assert_eq!(err.fallback_content(), "System RAG not initialized");
    }

    #[test]
    fn test_fallback_blank_detail_is_generic() {
        let err = DispatchError::Status {
            status: 500,
            detail: Some("   ".to_string()),
        };
        assert_eq!(err.fallback_content(), GENERIC_FALLBACK);
    }

    #[test]
    fn test_fallback_uses_failure_message() {
        let err = DispatchError::Transport("connection refused".to_string());
        assert_eq!(err.fallback_content(), "connection refused");

        let err = DispatchError::MalformedBody("expected value at line 1".to_string());
        assert_eq!(err.fallback_content(), "expected value at line 1");
    }

    #[test]
    fn test_fallback_generic_when_message_blank() {
        assert_eq!(
            DispatchError::Transport(String::new()).fallback_content(),
            GENERIC_FALLBACK
        );
        assert_eq!(
            DispatchError::MalformedBody(" \n".to_string()).fallback_content(),
            GENERIC_FALLBACK
        );
    }

    #[test]
    fn test_fallback_status_without_detail() {
        let err = DispatchError::Status {
            status: 404,
            detail: None,
        };
        assert_eq!(
            err.fallback_content(),
            "the answer service responded with HTTP 404"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }
}
