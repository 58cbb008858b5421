//! HTTP transport for the chat service.
//!
//! Thin `reqwest` wrapper for `POST {BASE_URL}/chat`. Response classification
//! lives in `parse_response` so it can be tested without a socket.

use super::config::ChatConfig;
use super::types::{ChatError, ChatReply, ChatRequest, ChatTransport, ErrorBody};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Build a transport with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::HttpClientBuild`] if the TLS backend or client
    /// cannot be initialized.
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.chat_url() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(network_error)?;

        tracing::debug!(%status, bytes = text.len(), "chat response received");
        parse_response(status, &text)
    }
}

fn network_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Network("request timed out".into())
    } else if e.is_connect() {
        ChatError::Network(format!("could not connect: {e}"))
    } else {
        ChatError::Network(e.to_string())
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Classify a completed HTTP exchange.
///
/// Non-2xx is a [`ChatError::Server`] carrying the body's `detail` when
/// present. A 2xx body must be JSON with a string `reply`.
fn parse_response(status: u16, body: &str) -> Result<ChatReply, ChatError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<ErrorBody>(body).ok().and_then(ErrorBody::detail_text);
        return Err(ChatError::Server { status, detail });
    }

    serde_json::from_str::<ChatReply>(body).map_err(|e| ChatError::Malformed(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
