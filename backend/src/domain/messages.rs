//! Direct messages between users.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of messages returned for a conversation.
pub const CONVERSATION_LIMIT: usize = 50;

/// A message from one user to another, optionally about a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub load_id: Option<Uuid>,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether the message was exchanged between `a` and `b` in either direction.
    pub fn between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

/// Sender input for a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub receiver_id: Uuid,
    pub content: String,
    pub load_id: Option<Uuid>,
}

/// Unread message counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_is_symmetric() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: a,
            receiver_id: b,
            load_id: None,
            content: "hello".to_owned(),
            read: false,
            created_at: Utc::now(),
        };
        assert!(message.between(a, b));
        assert!(message.between(b, a));
        assert!(!message.between(a, c));
    }
}
