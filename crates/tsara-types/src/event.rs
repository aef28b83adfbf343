//! Event types for the Tsara conversation event bus.
//!
//! `ConversationEvent` is broadcast by the conversation controller after
//! every mutation. All variants are Clone + Send + Sync for use with tokio
//! broadcast channels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ConversationMessage;

/// Conversation-level state shown by the front end.
///
/// There is no separate error state: a failed exchange returns to `Idle`
/// and shows up as an ordinary assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    AwaitingReply,
}

impl ConversationState {
    pub fn from_pending(pending: bool) -> Self {
        if pending {
            ConversationState::AwaitingReply
        } else {
            ConversationState::Idle
        }
    }
}

/// Events emitted by the conversation controller.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A message was appended to the log.
    MessageAppended {
        session_id: Uuid,
        message: ConversationMessage,
    },

    /// The pending flag changed.
    PendingChanged { session_id: Uuid, pending: bool },

    /// The log was discarded and a new session started.
    SessionReset {
        previous_session_id: Uuid,
        session_id: Uuid,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_pending() {
        assert_eq!(
            ConversationState::from_pending(true),
            ConversationState::AwaitingReply
        );
        assert_eq!(ConversationState::from_pending(false), ConversationState::Idle);
    }

    #[test]
    fn test_event_tagging() {
        let event = ConversationEvent::PendingChanged {
            session_id: Uuid::now_v7(),
            pending: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"pending_changed\""));
        assert!(json.contains("\"pending\":true"));
    }
}
