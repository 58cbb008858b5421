//! folio — the portfolio site's chat widget.
//!
//! `chat` holds the widget state machine and its reply transport, `render`
//! draws it as terminal text, and `app` hosts both in an interactive session.

pub mod app;
pub mod chat;
pub mod render;
