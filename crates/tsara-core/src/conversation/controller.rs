//! Conversation controller: owns the message log and the pending flag.
//!
//! The controller is a plain owned struct driven by a single task. `submit`
//! appends the user's message and hands the question to a [`Dispatch`]
//! implementation; `on_dispatch_settled` appends the reply. Every mutation is
//! published on the [`EventBus`].
//!
//! `submit` does not wait for earlier requests. Overlapping questions race,
//! and replies are appended in settlement order, which may differ from the
//! order the questions were asked in.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tsara_types::event::{ConversationEvent, ConversationState};
use tsara_types::message::ConversationMessage;

use crate::dispatch::{Dispatch, DispatchRequest, RequestId, Settlement};
use crate::event::EventBus;

/// Owned copy of the conversation for renderers.
#[derive(Debug, Clone)]
pub struct ConversationSnapshot {
    pub session_id: Uuid,
    pub messages: Vec<ConversationMessage>,
    pub pending: bool,
}

impl ConversationSnapshot {
    pub fn state(&self) -> ConversationState {
        ConversationState::from_pending(self.pending)
    }
}

/// Message lifecycle controller for one conversation.
pub struct ConversationController<D: Dispatch> {
    session_id: Uuid,
    messages: Vec<ConversationMessage>,
    pending: bool,
    draft: String,
    /// Requests dispatched in this session that have not settled yet.
    outstanding: HashSet<RequestId>,
    dispatcher: D,
    events: EventBus,
}

impl<D: Dispatch> ConversationController<D> {
    pub fn new(dispatcher: D) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            messages: Vec::new(),
            pending: false,
            draft: String::new(),
            outstanding: HashSet::new(),
            dispatcher,
            events: EventBus::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The log in append order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn state(&self) -> ConversationState {
        ConversationState::from_pending(self.pending)
    }

    /// Number of dispatched requests still waiting for a settlement.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            session_id: self.session_id,
            messages: self.messages.clone(),
            pending: self.pending,
        }
    }

    // --- Draft input ---

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the send action is enabled. Not gated on `pending`.
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Submit the current draft.
    pub fn submit_draft(&mut self) -> Option<RequestId> {
        let text = self.draft.clone();
        self.submit(&text)
    }

    // --- Lifecycle ---

    /// Accept a question and dispatch it.
    ///
    /// Blank input is ignored without any state change. Otherwise appends a
    /// user message with `text` verbatim, clears the draft, sets `pending`,
    /// and dispatches. A question may be submitted while another is pending.
    pub fn submit(&mut self, text: &str) -> Option<RequestId> {
        if text.trim().is_empty() {
            debug!("ignoring blank submission");
            return None;
        }

        self.append(ConversationMessage::user(text));
        self.draft.clear();
        self.set_pending(true);

        let request = DispatchRequest {
            request_id: RequestId::new(),
            session_id: self.session_id,
            query: text.to_string(),
        };
        let request_id = request.request_id;
        self.outstanding.insert(request_id);

        info!(
            request_id = %request_id,
            outstanding = self.outstanding.len(),
            "question submitted"
        );
        self.dispatcher.dispatch(request);

        Some(request_id)
    }

    /// Append the reply carried by a settlement and clear `pending`.
    ///
    /// `pending` is cleared even when other requests are still outstanding.
    /// Settlements that do not belong to an outstanding request of the
    /// current session (a duplicate, or one issued before a reset) are
    /// dropped and leave the log untouched.
    pub fn on_dispatch_settled(&mut self, settlement: Settlement) -> Option<&ConversationMessage> {
        if settlement.session_id != self.session_id
            || !self.outstanding.remove(&settlement.request_id)
        {
            warn!(
                request_id = %settlement.request_id,
                session_id = %settlement.session_id,
                "ignoring settlement for unknown request"
            );
            return None;
        }

        debug!(
            request_id = %settlement.request_id,
            success = settlement.is_success(),
            "appending reply"
        );
        self.append(settlement.reply);
        self.set_pending(false);
        self.messages.last()
    }

    /// Discard the log and start a new session.
    ///
    /// Requests still in flight keep running, but their settlements are
    /// ignored once they arrive.
    pub fn reset(&mut self) {
        let previous_session_id = self.session_id;
        self.session_id = Uuid::now_v7();
        self.messages.clear();
        self.draft.clear();
        self.outstanding.clear();
        self.pending = false;

        info!(
            previous_session_id = %previous_session_id,
            session_id = %self.session_id,
            "conversation reset"
        );
        self.events.publish(ConversationEvent::SessionReset {
            previous_session_id,
            session_id: self.session_id,
        });
    }

    fn append(&mut self, message: ConversationMessage) {
        self.messages.push(message.clone());
        self.events.publish(ConversationEvent::MessageAppended {
            session_id: self.session_id,
            message,
        });
    }

    fn set_pending(&mut self, pending: bool) {
        if self.pending == pending {
            return;
        }
        self.pending = pending;
        self.events.publish(ConversationEvent::PendingChanged {
            session_id: self.session_id,
            pending,
        });
    }
}
