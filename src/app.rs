//! Terminal host for the chat widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads visitor lines from stdin, maps them to widget commands, and prints
//! the rendered widget after every event. Requests run on spawned tasks and
//! report back over an mpsc channel, so `/close` and `/dismiss` stay live
//! while a reply is pending.
//!
//! LIFECYCLE
//! =========
//! Settlements that arrive after the app is dropped fail to send and are
//! discarded; the widget only ever sees settlements from its own channel.

use std::io::Write;
use std::sync::Arc;

use time::UtcOffset;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::chat::{ChatError, ChatReply, ChatTransport, ChatWidget, RequestTicket};
use crate::render;

const HELP: &str = "commands: /open /close /toggle /dismiss /help /quit; anything else is sent to the assistant";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("terminal IO failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Dismiss,
    Help,
    Quit,
    Say(String),
    Unknown(String),
}

/// Parse a raw input line. Slash commands are case-insensitive.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix('/') else {
        return Command::Say(line.to_owned());
    };
    match name.to_ascii_lowercase().as_str() {
        "open" => Command::Open,
        "close" => Command::Close,
        "toggle" => Command::Toggle,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_owned()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A request ticket paired with its outcome.
pub type Settlement = (RequestTicket, Result<ChatReply, ChatError>);

pub struct App {
    widget: ChatWidget,
    transport: Arc<dyn ChatTransport>,
    settled_tx: mpsc::UnboundedSender<Settlement>,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
    notice: Option<String>,
    offset: UtcOffset,
}

impl App {
    pub fn new(widget: ChatWidget, transport: Arc<dyn ChatTransport>, offset: UtcOffset) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self { widget, transport, settled_tx, settled_rx, notice: None, offset }
    }

    #[must_use]
    pub fn widget(&self) -> &ChatWidget {
        &self.widget
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Apply one input line. Submissions are dispatched on a spawned task.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        self.notice = None;
        match parse_command(line) {
            Command::Open => self.widget.open(),
            Command::Close => self.widget.close(),
            Command::Toggle => self.widget.toggle(),
            Command::Dismiss => self.widget.dismiss_error(),
            Command::Help => self.notice = Some(HELP.to_owned()),
            Command::Quit => return Flow::Quit,
            Command::Unknown(cmd) => self.notice = Some(format!("unknown command {cmd}; try /help")),
            Command::Say(text) => self.say(text),
        }
        Flow::Continue
    }

    fn say(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        if self.widget.is_disabled() {
            self.notice = Some("Chatbot temporarily disabled".to_owned());
            return;
        }
        if !self.widget.is_open() {
            self.notice = Some("chat is closed; type /open first".to_owned());
            return;
        }

        self.widget.set_draft(text.as_str());
        let Some(pending) = self.widget.submit(&text) else {
            return;
        };

        let transport = Arc::clone(&self.transport);
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.send(pending.request).await;
            if tx.send((pending.ticket, outcome)).is_err() {
                tracing::debug!("chat host gone; dropping late settlement");
            }
        });
    }

    /// Wait for the next request to settle.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        self.settled_rx.recv().await
    }

    pub fn apply(&mut self, (ticket, outcome): Settlement) {
        let ok = outcome.is_ok();
        if self.widget.settle(ticket, outcome) {
            tracing::info!(ok, "chat request settled");
        }
    }

    /// Current screen: widget, optional notice, then the input prompt.
    #[must_use]
    pub fn frame(&self) -> String {
        let mut lines = render::render(&self.widget, self.offset);
        if let Some(notice) = &self.notice {
            lines.push(format!("  {notice}"));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out.push_str(render::prompt(&self.widget));
        out
    }

    /// Run until `/quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if stdin cannot be read.
    pub async fn run(mut self) -> Result<(), AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.draw();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                Some(settlement) = self.settled_rx.recv() => {
                    self.apply(settlement);
                }
            }
            self.draw();
        }

        if self.widget.is_pending() {
            tracing::debug!("exiting with a chat request still pending");
        }
        Ok(())
    }

    fn draw(&self) {
        print!("\n{}", self.frame());
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
