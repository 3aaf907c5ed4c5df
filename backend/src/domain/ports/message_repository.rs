//! Port for direct messages.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Message;

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {}
}

/// Port for messaging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Messages sent or received by `user_id`, newest first.
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Messages exchanged between two users, newest first, at most `limit`.
    async fn conversation(
        &self,
        user_id: &Uuid,
        other_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Insert a message.
    async fn create_message(&self, message: &Message) -> Result<(), MessageRepositoryError>;

    /// Mark a message read when `receiver_id` received it; returns whether a
    /// row changed.
    async fn mark_read(
        &self,
        message_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, MessageRepositoryError>;

    /// Unread messages received by `user_id`.
    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, MessageRepositoryError>;
}
