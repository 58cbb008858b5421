//! Chat message model.
//!
//! Messages are immutable once created; the widget only ever appends them.

use time::OffsetDateTime;

/// Fixed reply appended when a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Something went wrong. Please check your connection and try again.";

/// Opening line seeded into a fresh widget.
pub const GREETING: &str = "Hi! Ask me about my projects, skills, or experience.";

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Visitor,
    Assistant,
}

/// Whether a message reports a failed exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Ok,
    Error,
}

/// One bubble in the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    text: String,
    role: Role,
    status: Status,
    timestamp: OffsetDateTime,
}

impl Message {
    #[must_use]
    pub fn visitor(text: impl Into<String>) -> Self {
        Self::new(text, Role::Visitor, Status::Ok)
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Role::Assistant, Status::Ok)
    }

    /// The fallback assistant message shown after a failed request.
    #[must_use]
    pub fn failure() -> Self {
        Self::new(FALLBACK_REPLY, Role::Assistant, Status::Error)
    }

    fn new(text: impl Into<String>, role: Role, status: Status) -> Self {
        Self { text: text.into(), role, status, timestamp: OffsetDateTime::now_utc() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    #[must_use]
    pub fn is_from_visitor(&self) -> bool {
        self.role == Role::Visitor
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}
