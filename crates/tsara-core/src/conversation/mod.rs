//! Conversation state: the ordered message log and the pending flag.

pub mod controller;

pub use controller::{ConversationController, ConversationSnapshot};
