//! Chat types — wire payloads, error taxonomy, and the transport seam.
//!
//! The remote reply service is opaque: one JSON request in, one JSON reply
//! out. Everything the widget knows about it lives here.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by chat configuration and transport operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// A configuration value could not be parsed or was out of range.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// No response was received (connect failure, reset, timeout).
    #[error("network request failed: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("server returned status {status}")]
    Server { status: u16, detail: Option<String> },

    /// The service answered 2xx but the body lacked a usable `reply`.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ChatError {
    /// Text shown in the dismissible error banner.
    ///
    /// Prefers the server-provided `detail` over the generic display text.
    #[must_use]
    pub fn banner_text(&self) -> String {
        match self {
            Self::Server { detail: Some(detail), .. } if !detail.trim().is_empty() => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Stable short code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Network(_) => "E_NETWORK",
            Self::Server { .. } => "E_SERVER",
            Self::Malformed(_) => "E_MALFORMED",
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body of `POST {BASE_URL}/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful reply from the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Optional error body (`{"detail": "..."}`) on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Extract a displayable detail string, if the body carried one.
    ///
    /// Non-string details (validation error arrays) are rendered as compact JSON.
    pub(crate) fn detail_text(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// Async seam between the widget and the reply service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one visitor message and wait for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Network`], [`ChatError::Server`], or
    /// [`ChatError::Malformed`] when the exchange does not produce a reply.
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError>;
}
