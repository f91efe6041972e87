//! Inbox review session over the backend's Gmail preview.
//!
//! Holds the queue of unread messages and applies the two per-message
//! actions: send the (possibly edited) suggested reply, or skip. Terminal
//! input/output stays in the orchestrator; this module only mutates the
//! queue and reports outcomes.

use crate::api::ApiClient;
use crate::models::{GmailMessage, OutgoingReply};
use crate::ui::Severity;

/// Outcome of one inbox action, rendered by the caller as a toast
#[derive(Debug)]
pub struct InboxEvent {
    pub message: String,
    pub severity: Severity,
}

impl InboxEvent {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// The reviewable queue. Each item's lifecycle ends when the user sends a
/// reply or marks it read; it is then removed from the displayed set.
pub struct InboxSession {
    items: Vec<GmailMessage>,
}

impl InboxSession {
    pub fn new(items: Vec<GmailMessage>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[GmailMessage] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&GmailMessage> {
        self.items.first()
    }

    /// Send `body` as the reply to the message at `index`, then mark it
    /// read and remove it from the queue. The card is removed only when the
    /// send itself succeeded; a mark-read failure after a successful send
    /// is reported but does not keep the card.
    pub async fn send_reply(
        &mut self,
        index: usize,
        body: String,
        api: &ApiClient,
    ) -> Vec<InboxEvent> {
        let Some(message) = self.items.get(index) else {
            return vec![InboxEvent::error("No such message in the queue")];
        };

        let reply = OutgoingReply {
            to: message.reply_address(),
            subject: message.subject.clone(),
            body,
            thread_id: message.thread_id.clone(),
        };

        if let Err(e) = api.gmail_send(&reply).await {
            return vec![InboxEvent::error(format!("Failed to send: {}", e))];
        }

        let mut events = Vec::new();
        if let Err(e) = api.gmail_mark_read(&message.id).await {
            events.push(InboxEvent::error(format!(
                "Reply sent, but marking as read failed: {}",
                e
            )));
        } else {
            events.push(InboxEvent::success("Reply sent and marked as read!"));
        }

        self.items.remove(index);
        events
    }

    /// Mark the message at `index` read and remove it from the queue. The
    /// removal is unconditional: when mark-read fails the failure is only
    /// reported, and the card is removed regardless.
    pub async fn skip(&mut self, index: usize, api: &ApiClient) -> Vec<InboxEvent> {
        let Some(message) = self.items.get(index) else {
            return vec![InboxEvent::error("No such message in the queue")];
        };

        let event = match api.gmail_mark_read(&message.id).await {
            Ok(_) => InboxEvent::success("Email marked as read"),
            Err(e) => InboxEvent::error(format!("Failed to mark as read: {}", e)),
        };

        self.items.remove(index);
        vec![event]
    }
}
