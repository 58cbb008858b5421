//! Chat — the portfolio assistant widget and its reply transport.
//!
//! DESIGN
//! ======
//! The widget (`widget`) is a pure state machine; the reply service sits
//! behind the `ChatTransport` trait (`types`) with a `reqwest` implementation
//! in `http`. The host wires the two together and owns the event loop.

pub mod config;
pub mod http;
pub mod message;
pub mod types;
pub mod widget;

pub use config::{ChatConfig, ChatTimeouts};
pub use http::HttpTransport;
pub use message::{Message, Role, Status};
pub use types::{ChatError, ChatReply, ChatRequest, ChatTransport};
pub use widget::{ChatWidget, PendingRequest, Phase, RequestTicket};
