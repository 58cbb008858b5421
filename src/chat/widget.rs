//! Chat widget state machine.
//!
//! DESIGN
//! ======
//! The widget never performs IO itself. `submit` appends the visitor bubble
//! and hands back a [`PendingRequest`]; the host delivers it through a
//! [`ChatTransport`] and feeds the outcome to `settle`. Keeping the request
//! outside `&mut self` lets the host process open/close/dismiss events while
//! a reply is outstanding.
//!
//! INVARIANTS
//! ==========
//! - At most one request is outstanding; submits while pending are dropped.
//! - Messages are append-only, in insertion order.
//! - Only the ticket of the outstanding request can settle it, so a late or
//!   duplicated settlement is a no-op.

use super::message::{GREETING, Message};
use super::types::{ChatError, ChatReply, ChatRequest, ChatTransport};

/// Identifies one submitted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

/// A request the host must deliver and then settle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub request: ChatRequest,
}

/// Coarse widget state for rendering and input routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Idle,
    AwaitingReply,
}

#[derive(Debug)]
pub struct ChatWidget {
    open: bool,
    disabled: bool,
    messages: Vec<Message>,
    pending: Option<RequestTicket>,
    last_error: Option<String>,
    draft: String,
    next_ticket: u64,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    /// A closed widget seeded with the greeting bubble.
    #[must_use]
    pub fn new() -> Self {
        let mut widget = Self::without_greeting();
        widget.messages.push(Message::assistant(GREETING));
        widget
    }

    /// A closed widget with an empty history.
    #[must_use]
    pub fn without_greeting() -> Self {
        Self {
            open: false,
            disabled: false,
            messages: Vec::new(),
            pending: None,
            last_error: None,
            draft: String::new(),
            next_ticket: 0,
        }
    }

    /// A widget whose launcher is shown but cannot be opened.
    #[must_use]
    pub fn disabled() -> Self {
        Self { disabled: true, ..Self::new() }
    }

    // =========================================================================
    // VISIBILITY
    // =========================================================================

    /// Show the panel. Clears any stale error banner; history is untouched.
    pub fn open(&mut self) {
        if self.disabled {
            tracing::debug!("chat widget disabled; ignoring open");
            return;
        }
        self.open = true;
        self.last_error = None;
    }

    /// Hide the panel. An outstanding request keeps running and still settles.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    // =========================================================================
    // EXCHANGE
    // =========================================================================

    /// Accept visitor text and produce the request to deliver.
    ///
    /// Returns `None` (and changes nothing) when the text is blank, a request
    /// is already pending, or the panel is closed.
    pub fn submit(&mut self, text: &str) -> Option<PendingRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.open {
            tracing::debug!("chat widget closed; ignoring submit");
            return None;
        }
        if self.pending.is_some() {
            tracing::debug!("chat request already pending; ignoring submit");
            return None;
        }

        self.messages.push(Message::visitor(trimmed));
        self.draft.clear();
        self.last_error = None;

        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);

        tracing::debug!(ticket = ticket.0, chars = trimmed.chars().count(), "chat request submitted");
        Some(PendingRequest { ticket, request: ChatRequest { message: trimmed.to_owned() } })
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` without touching state when `ticket` is not the
    /// outstanding request.
    pub fn settle(&mut self, ticket: RequestTicket, outcome: Result<ChatReply, ChatError>) -> bool {
        if self.pending != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "ignoring stale chat settlement");
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.reply));
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.0, code = e.error_code(), error = %e, "chat request failed");
                self.messages.push(Message::failure());
                self.last_error = Some(e.banner_text());
            }
        }
        true
    }

    /// Submit, deliver through `transport`, and settle in one step.
    ///
    /// Returns `false` if the submit was rejected.
    pub async fn send(&mut self, transport: &dyn ChatTransport, text: &str) -> bool {
        let Some(pending) = self.submit(text) else {
            return false;
        };
        let outcome = transport.send(pending.request).await;
        self.settle(pending.ticket, outcome)
    }

    /// Hide the error banner.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.open, self.pending.is_some()) {
            (false, _) => Phase::Closed,
            (true, false) => Phase::Idle,
            (true, true) => Phase::AwaitingReply,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
