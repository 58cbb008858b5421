//! Chat endpoint configuration.

use std::time::Duration;

use super::types::ChatError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

const CHAT_PATH: &str = "/chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl ChatTimeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub base_url: String,
    pub timeouts: ChatTimeouts,
    pub disabled: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeouts: ChatTimeouts::default(), disabled: false }
    }
}

impl ChatConfig {
    /// Build a validated config.
    ///
    /// An empty or absent base URL falls back to [`DEFAULT_BASE_URL`].
    /// Trailing slashes are trimmed so `{base}/chat` never doubles up.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ConfigParse`] if the URL is not `http(s)://` or a
    /// timeout is zero.
    pub fn new(base_url: Option<&str>, timeouts: ChatTimeouts, disabled: bool) -> Result<Self, ChatError> {
        let base_url = parse_base_url(base_url)?;
        if timeouts.request_secs == 0 {
            return Err(ChatError::ConfigParse("request timeout must be at least 1 second".into()));
        }
        if timeouts.connect_secs == 0 {
            return Err(ChatError::ConfigParse("connect timeout must be at least 1 second".into()));
        }
        Ok(Self { base_url, timeouts, disabled })
    }

    /// Full URL of the chat endpoint.
    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url)
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ChatError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BASE_URL);
    let (scheme, rest) = ["http://", "https://"]
        .into_iter()
        .find_map(|scheme| raw.strip_prefix(scheme).map(|rest| (scheme, rest)))
        .ok_or_else(|| ChatError::ConfigParse(format!("base URL must start with http:// or https://: {raw}")))?;

    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return Err(ChatError::ConfigParse(format!("base URL has no host: {raw}")));
    }

    Ok(format!("{scheme}{rest}"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
