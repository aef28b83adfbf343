//! HTTP implementation of the answer service port.

pub mod client;

pub use client::{normalize_base_url, HttpAnswerService};
