//! Message lifecycle core for Tsara.
//!
//! This crate defines the answer service port (`AnswerService`), the request
//! dispatcher, the conversation controller, and the reply view builder. It
//! depends only on `tsara-types` -- never on `tsara-infra` or any HTTP crate.

pub mod answer;
pub mod conversation;
pub mod dispatch;
pub mod event;
pub mod render;
