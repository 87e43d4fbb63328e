use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::ChatRole;

/// A single chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only chat history of a session
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    /// Next message id; survives `clear` so ids are never reused
    next_id: u64,
}

impl Transcript {
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop all messages (session reset only).
    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase() {
        let mut t = Transcript::default();
        let a = t.push(ChatRole::User, "hi").id;
        let b = t.push(ChatRole::Bot, "hello").id;
        assert!(b > a);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut t = Transcript::default();
        let before = t.push(ChatRole::User, "one").id;
        t.clear();
        assert!(t.is_empty());
        let after = t.push(ChatRole::User, "two").id;
        assert!(after > before);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut t = Transcript::default();
        t.push(ChatRole::User, "first");
        t.push(ChatRole::Bot, "second");
        t.push(ChatRole::User, "third");
        let contents: Vec<_> = t.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }
}
