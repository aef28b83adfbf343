//! AnswerService trait definition.
//!
//! Uses native async fn in traits (RPITIT) with an explicit `Send` bound on
//! each future so calls can be moved onto spawned tokio tasks.

use std::future::Future;

use tsara_types::error::DispatchError;
use tsara_types::research::{HealthResponse, ReloadResponse, ResearchResponse};

/// Trait for answer-generation backends.
///
/// The service's retrieval and generation internals are opaque; the client
/// only sees one request/response exchange per question.
pub trait AnswerService: Send + Sync + 'static {
    /// Human-readable endpoint description for banners and footers.
    fn endpoint(&self) -> &str;

    /// Send one question and wait for its structured answer.
    ///
    /// Non-success statuses, transport failures, and unreadable bodies all
    /// surface as `DispatchError`.
    fn ask(
        &self,
        message: &str,
    ) -> impl Future<Output = Result<ResearchResponse, DispatchError>> + Send;

    /// Ask the service whether it is ready.
    fn health(&self) -> impl Future<Output = Result<HealthResponse, DispatchError>> + Send;

    /// Ask the service to rebuild its document index.
    fn reload(&self) -> impl Future<Output = Result<ReloadResponse, DispatchError>> + Send;
}
