//! Conversation log entries for Tsara.
//!
//! A `ConversationMessage` is created exactly once, either when the user
//! submits a question or when a dispatched request settles, and is never
//! mutated afterwards. Fields are private; the only way to build a message
//! is through [`ConversationMessage::user`] and
//! [`ConversationMessage::assistant`], so research fields can only ever be
//! attached to assistant replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Unique identifier for a conversation message (UUIDv7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A resolved real-world contact or organization.
///
/// Only `name` is required. Every other field is independently optional
/// and consumers must render each one conditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntity {
    pub name: String,
    /// Category tag, e.g. "office" or "agency". Named `type` on the wire.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ContactEntity {
    /// An entity carrying nothing but its display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            address: None,
            phone: None,
            email: None,
            website: None,
        }
    }
}

/// Research fields the answer service may attach to a reply.
///
/// `tools_used` stays `None` when the service omitted it; `sources` and
/// `entities` default to empty sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub entities: Vec<ContactEntity>,
}

/// One entry in the conversation log.
///
/// Serialize-only: messages are built by the constructors, never decoded,
/// so a user message can never carry research fields.
///
/// ```compile_fail
/// let json = r#"{"role":"user","content":"hi","research":{"topic":"x"}}"#;
/// let _: tsara_types::message::ConversationMessage = serde_json::from_str(json).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationMessage {
    id: MessageId,
    role: MessageRole,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    research: Option<ResearchDetails>,
}

impl ConversationMessage {
    /// A message typed by the user. Content is kept verbatim.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            research: None,
        }
    }

    /// A reply from the answer service, or a fallback reply after a failure
    /// (in which case `research` is `None`).
    pub fn assistant(content: impl Into<String>, research: Option<ResearchDetails>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            research,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Creation time, fixed at construction.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn research(&self) -> Option<&ResearchDetails> {
        self.research.as_ref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.research.as_ref().and_then(|r| r.topic.as_deref())
    }

    /// Tools in the order the service reported them. Empty when absent.
    pub fn tools_used(&self) -> &[String] {
        self.research
            .as_ref()
            .and_then(|r| r.tools_used.as_deref())
            .unwrap_or(&[])
    }

    pub fn sources(&self) -> &[String] {
        self.research.as_ref().map_or(&[], |r| r.sources.as_slice())
    }

    pub fn entities(&self) -> &[ContactEntity] {
        self.research.as_ref().map_or(&[], |r| r.entities.as_slice())
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
