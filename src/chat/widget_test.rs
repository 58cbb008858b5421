use super::*;
use crate::chat::message::{FALLBACK_REPLY, Role, Status};
use std::sync::Mutex;

// =========================================================================
// MockTransport
// =========================================================================

struct MockTransport {
    outcomes: Mutex<Vec<Result<ChatReply, ChatError>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    fn new(outcomes: Vec<Result<ChatReply, ChatError>>) -> Self {
        Self { outcomes: Mutex::new(outcomes), seen: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        self.seen.lock().unwrap().push(request);
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            Ok(ChatReply { reply: "done".into() })
        } else {
            outcomes.remove(0)
        }
    }
}

fn reply(text: &str) -> Result<ChatReply, ChatError> {
    Ok(ChatReply { reply: text.into() })
}

fn opened() -> ChatWidget {
    let mut widget = ChatWidget::without_greeting();
    widget.open();
    widget
}

// =========================================================================
// construction / visibility
// =========================================================================

#[test]
fn new_widget_is_closed_with_greeting() {
    let widget = ChatWidget::new();
    assert_eq!(widget.phase(), Phase::Closed);
    assert_eq!(widget.messages().len(), 1);
    assert_eq!(widget.messages()[0].role(), Role::Assistant);
    assert!(!widget.is_pending());
    assert!(widget.last_error().is_none());
}

#[test]
fn open_and_close_toggle_phase() {
    let mut widget = ChatWidget::new();
    widget.open();
    assert_eq!(widget.phase(), Phase::Idle);
    widget.close();
    assert_eq!(widget.phase(), Phase::Closed);
    widget.toggle();
    assert!(widget.is_open());
    widget.toggle();
    assert!(!widget.is_open());
}

#[test]
fn disabled_widget_never_opens() {
    let mut widget = ChatWidget::disabled();
    assert!(widget.is_disabled());
    widget.open();
    assert_eq!(widget.phase(), Phase::Closed);
    widget.toggle();
    assert_eq!(widget.phase(), Phase::Closed);
}

#[test]
fn close_then_open_preserves_history() {
    let mut widget = opened();
    let p = widget.submit("first").unwrap();
    widget.settle(p.ticket, reply("one"));
    let before: Vec<Message> = widget.messages().to_vec();

    widget.close();
    widget.open();

    assert_eq!(widget.messages(), before.as_slice());
}

#[test]
fn open_clears_stale_error_banner() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();
    widget.settle(p.ticket, Err(ChatError::Network("refused".into())));
    assert!(widget.last_error().is_some());

    widget.close();
    widget.open();
    assert!(widget.last_error().is_none());
    assert!(widget.messages().last().unwrap().is_error());
}

// =========================================================================
// submit
// =========================================================================

#[test]
fn submit_appends_visitor_message_before_settle() {
    let mut widget = opened();
    widget.set_draft("  tell me about rust  ");

    let pending = widget.submit("  tell me about rust  ").unwrap();

    assert_eq!(widget.messages().len(), 1);
    let msg = &widget.messages()[0];
    assert!(msg.is_from_visitor());
    assert_eq!(msg.text(), "tell me about rust");
    assert_eq!(pending.request, ChatRequest { message: "tell me about rust".into() });
    assert_eq!(widget.phase(), Phase::AwaitingReply);
    assert!(widget.draft().is_empty());
}

#[test]
fn submit_blank_text_is_noop() {
    let mut widget = opened();
    widget.set_draft("   ");

    assert!(widget.submit("").is_none());
    assert!(widget.submit("   ").is_none());
    assert!(widget.submit("\n\t").is_none());

    assert!(widget.messages().is_empty());
    assert!(!widget.is_pending());
    assert_eq!(widget.draft(), "   ");
}

#[test]
fn submit_while_pending_is_rejected_not_queued() {
    let mut widget = opened();
    let first = widget.submit("one").unwrap();

    assert!(widget.submit("two").is_none());
    assert_eq!(widget.messages().len(), 1);

    widget.settle(first.ticket, reply("ok"));
    assert_eq!(widget.messages().len(), 2);
    assert!(widget.messages().iter().all(|m| m.text() != "two"));
}

#[test]
fn submit_while_closed_is_noop() {
    let mut widget = ChatWidget::without_greeting();
    assert!(widget.submit("hello").is_none());
    assert!(widget.messages().is_empty());
}

#[test]
fn submit_clears_previous_error() {
    let mut widget = opened();
    let p = widget.submit("a").unwrap();
    widget.settle(p.ticket, Err(ChatError::Malformed("no reply".into())));
    assert!(widget.last_error().is_some());

    widget.submit("b").unwrap();
    assert!(widget.last_error().is_none());
}

// =========================================================================
// settle
// =========================================================================

#[test]
fn settle_success_appends_single_assistant_reply() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();

    assert!(widget.settle(p.ticket, reply("Hello")));

    assert_eq!(widget.messages().len(), 2);
    let last = widget.messages().last().unwrap();
    assert_eq!(last.role(), Role::Assistant);
    assert_eq!(last.text(), "Hello");
    assert_eq!(last.status(), Status::Ok);
    assert!(!widget.is_pending());
    assert!(widget.last_error().is_none());
}

#[test]
fn settle_server_error_appends_fallback_and_records_error() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();

    widget.settle(p.ticket, Err(ChatError::Server { status: 500, detail: None }));

    assert_eq!(widget.messages().len(), 2);
    let last = widget.messages().last().unwrap();
    assert_eq!(last.status(), Status::Error);
    assert_eq!(last.role(), Role::Assistant);
    assert_eq!(last.text(), FALLBACK_REPLY);
    assert!(!widget.last_error().unwrap().is_empty());
    assert!(!widget.is_pending());
}

#[test]
fn settle_prefers_server_detail_for_banner() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();
    widget.settle(p.ticket, Err(ChatError::Server { status: 503, detail: Some("model warming up".into()) }));
    assert_eq!(widget.last_error(), Some("model warming up"));
}

#[test]
fn settle_with_stale_ticket_is_ignored() {
    let mut widget = opened();
    let first = widget.submit("one").unwrap();
    widget.settle(first.ticket, reply("r1"));

    let second = widget.submit("two").unwrap();
    assert!(!widget.settle(first.ticket, reply("late")));
    assert_eq!(widget.messages().len(), 3);
    assert!(widget.is_pending());

    assert!(widget.settle(second.ticket, reply("r2")));
    assert!(!widget.settle(second.ticket, reply("duplicate")));
    assert_eq!(widget.messages().len(), 4);
}

#[test]
fn settle_after_close_still_lands_in_history() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();
    widget.close();

    assert!(widget.settle(p.ticket, reply("later")));
    assert_eq!(widget.phase(), Phase::Closed);
    widget.open();
    assert_eq!(widget.messages().last().unwrap().text(), "later");
}

#[test]
fn dismiss_error_clears_banner_only() {
    let mut widget = opened();
    let p = widget.submit("hi").unwrap();
    widget.settle(p.ticket, Err(ChatError::Network("timeout".into())));
    let count = widget.messages().len();

    widget.dismiss_error();

    assert!(widget.last_error().is_none());
    assert_eq!(widget.messages().len(), count);
}

#[test]
fn messages_keep_insertion_order() {
    let mut widget = opened();
    for (q, a) in [("q1", "a1"), ("q2", "a2"), ("q2", "a2")] {
        let p = widget.submit(q).unwrap();
        widget.settle(p.ticket, reply(a));
    }
    let texts: Vec<&str> = widget.messages().iter().map(Message::text).collect();
    assert_eq!(texts, ["q1", "a1", "q2", "a2", "q2", "a2"]);
}

// =========================================================================
// send
// =========================================================================

#[tokio::test]
async fn send_round_trips_through_transport() {
    let transport = MockTransport::new(vec![reply("Hello")]);
    let mut widget = opened();

    assert!(widget.send(&transport, " hi ").await);

    assert_eq!(transport.seen.lock().unwrap().as_slice(), [ChatRequest { message: "hi".into() }]);
    let texts: Vec<&str> = widget.messages().iter().map(Message::text).collect();
    assert_eq!(texts, ["hi", "Hello"]);
    assert!(!widget.is_pending());
}

#[tokio::test]
async fn send_failure_surfaces_fallback() {
    let transport = MockTransport::new(vec![Err(ChatError::Network("connection refused".into()))]);
    let mut widget = opened();

    assert!(widget.send(&transport, "hi").await);

    assert!(widget.messages().last().unwrap().is_error());
    assert!(widget.last_error().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn send_blank_text_never_reaches_transport() {
    let transport = MockTransport::new(Vec::new());
    let mut widget = opened();

    assert!(!widget.send(&transport, "   ").await);
    assert!(transport.seen.lock().unwrap().is_empty());
}
