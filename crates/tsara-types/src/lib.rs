//! Shared domain types for Tsara.
//!
//! This crate contains the conversation message model, the answer service
//! wire types, client configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod research;
