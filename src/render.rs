//! Terminal rendering for the chat widget.
//!
//! Pure functions from widget state to text lines. The host decides when to
//! print; nothing here touches stdout.

use time::{OffsetDateTime, UtcOffset};

use crate::chat::{ChatWidget, Message, Phase, Role, Status};

const TITLE: &str = "Portfolio Assistant";
const SUBTITLE: &str = "Ask about projects & experience";
const LAUNCHER: &str = "( Ask AI )";
const THINKING: &str = "AI is thinking...";
const RULE_WIDTH: usize = 48;

/// Render the full widget: the launcher when closed, the panel when open.
#[must_use]
pub fn render(widget: &ChatWidget, offset: UtcOffset) -> Vec<String> {
    if widget.phase() == Phase::Closed {
        return vec![launcher(widget)];
    }

    let mut lines = Vec::new();
    lines.push(format!("╭─ {TITLE} {}", "─".repeat(RULE_WIDTH.saturating_sub(TITLE.len() + 4))));
    lines.push(format!("│ {SUBTITLE}"));
    lines.push(format!("├{}", "─".repeat(RULE_WIDTH - 1)));

    for message in widget.messages() {
        lines.extend(bubble(message, offset));
    }
    if widget.phase() == Phase::AwaitingReply {
        lines.push(format!("│ {} {THINKING}", label(Role::Assistant, Status::Ok)));
    }

    if let Some(error) = widget.last_error() {
        lines.push(format!("├{}", "─".repeat(RULE_WIDTH - 1)));
        lines.push(format!("│ ! {error}  [/dismiss]"));
    }
    lines.push(format!("╰{}", "─".repeat(RULE_WIDTH - 1)));
    lines
}

/// Input prompt shown after the panel.
#[must_use]
pub fn prompt(widget: &ChatWidget) -> &'static str {
    match widget.phase() {
        Phase::Closed => "",
        Phase::Idle => "> ",
        Phase::AwaitingReply => "… ",
    }
}

fn launcher(widget: &ChatWidget) -> String {
    if widget.is_disabled() {
        format!("{LAUNCHER}  Chatbot temporarily disabled")
    } else {
        format!("{LAUNCHER}  type /open to chat")
    }
}

/// One message as one or more lines; continuation lines align under the text.
fn bubble(message: &Message, offset: UtcOffset) -> Vec<String> {
    let head = format!("{} {} ", label(message.role(), message.status()), format_time(message.timestamp(), offset));
    let indent = " ".repeat(head.chars().count());

    let mut text_lines = message.text().lines();
    let first = text_lines.next().unwrap_or_default();
    let mut lines = vec![format!("│ {head}{first}")];
    lines.extend(text_lines.map(|line| format!("│ {indent}{line}")));
    lines
}

fn label(role: Role, status: Status) -> &'static str {
    match (role, status) {
        (Role::Visitor, _) => "you ›",
        (Role::Assistant, Status::Ok) => " ai ›",
        (Role::Assistant, Status::Error) => " ai !",
    }
}

/// `HH:MM` in the given offset.
#[must_use]
pub fn format_time(ts: OffsetDateTime, offset: UtcOffset) -> String {
    let local = ts.to_offset(offset);
    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// Local offset for timestamps, falling back to UTC when the platform
/// cannot report it safely.
#[must_use]
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
