//! Port for the external answer-generation service.
//!
//! Implementations live in tsara-infra (e.g., `HttpAnswerService`).

pub mod service;

pub use service::AnswerService;
