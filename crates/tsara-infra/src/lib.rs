//! Infrastructure layer for Tsara.
//!
//! Contains the HTTP implementation of the `AnswerService` port defined in
//! `tsara-core` and the client configuration loader.

pub mod config;
pub mod http;
