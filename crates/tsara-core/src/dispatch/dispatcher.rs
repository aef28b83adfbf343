//! RequestDispatcher -- spawns one task per question and reports settlements.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::answer::AnswerService;

use super::settlement::{DispatchRequest, Settlement};

/// Hands accepted questions to whatever performs the outbound call.
///
/// The controller only depends on this trait, so it performs no I/O itself.
/// Implementations must eventually produce exactly one [`Settlement`] per
/// request.
pub trait Dispatch {
    fn dispatch(&self, request: DispatchRequest);
}

/// Dispatcher backed by an [`AnswerService`] and tokio tasks.
///
/// Requests are never retried, cached, deduplicated, or cancelled. Each
/// spawned task sends its settlement on the channel returned by
/// [`RequestDispatcher::new`]; settlements arrive in completion order.
pub struct RequestDispatcher<S: AnswerService> {
    service: Arc<S>,
    settlements: mpsc::UnboundedSender<Settlement>,
}

impl<S: AnswerService> RequestDispatcher<S> {
    /// Create a dispatcher and the receiver its settlements arrive on.
    pub fn new(service: Arc<S>) -> (Self, mpsc::UnboundedReceiver<Settlement>) {
        let (settlements, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                settlements,
            },
            rx,
        )
    }
}

impl<S: AnswerService> Dispatch for RequestDispatcher<S> {
    fn dispatch(&self, request: DispatchRequest) {
        let service = Arc::clone(&self.service);
        let settlements = self.settlements.clone();

        info!(request_id = %request.request_id, "dispatching question");
        tokio::spawn(async move {
            let settlement = settle(service.as_ref(), request).await;
            if settlements.send(settlement).is_err() {
                debug!("settlement receiver dropped, discarding reply");
            }
        });
    }
}

/// Perform one call and build its settlement.
pub async fn settle<S: AnswerService>(service: &S, request: DispatchRequest) -> Settlement {
    let started = Instant::now();
    let outcome = service.ask(&request.query).await;
    let elapsed = started.elapsed();

    info!(
        request_id = %request.request_id,
        success = outcome.is_ok(),
        elapsed_ms = elapsed.as_millis() as u64,
        "question settled"
    );

    Settlement::from_outcome(&request, outcome, elapsed)
}
