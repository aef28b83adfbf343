//! Request dispatch: one user question in, one settlement out.
//!
//! `RequestDispatcher` runs each call to the [`AnswerService`](crate::answer::AnswerService)
//! on its own tokio task and reports the result as a [`Settlement`] over an
//! mpsc channel. It never touches the conversation log.

pub mod dispatcher;
pub mod settlement;

pub use dispatcher::{Dispatch, RequestDispatcher};
pub use settlement::{DispatchRequest, RequestId, Settlement};
