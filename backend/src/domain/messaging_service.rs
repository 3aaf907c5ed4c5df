//! Direct messaging between users.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{AuthenticatedUser, CONVERSATION_LIMIT, Error, Message, MessageDraft, UnreadCount};

fn map_repository_error(error: MessageRepositoryError) -> Error {
    match error {
        MessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("message repository unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            Error::internal(format!("message repository error: {message}"))
        }
        MessageRepositoryError::Conflict { message } => Error::conflict(message),
        MessageRepositoryError::MissingReference { .. } => {
            Error::not_found("Receiver or load not found")
        }
    }
}

/// Messaging service.
#[derive(Clone)]
pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl MessagingService {
    /// Create the service from its repository and clock.
    pub fn new(messages: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { messages, clock }
    }

    /// Messages the caller sent or received, newest first.
    pub async fn list_messages(&self, caller: &AuthenticatedUser) -> Result<Vec<Message>, Error> {
        self.messages
            .list_for_user(&caller.id)
            .await
            .map_err(map_repository_error)
    }

    /// The most recent messages between the caller and `other_id`.
    pub async fn conversation(
        &self,
        caller: &AuthenticatedUser,
        other_id: Uuid,
    ) -> Result<Vec<Message>, Error> {
        self.messages
            .conversation(&caller.id, &other_id, CONVERSATION_LIMIT)
            .await
            .map_err(map_repository_error)
    }

    /// Send an unread message.
    pub async fn send_message(
        &self,
        caller: &AuthenticatedUser,
        draft: MessageDraft,
    ) -> Result<Message, Error> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: caller.id,
            receiver_id: draft.receiver_id,
            load_id: draft.load_id,
            content: draft.content,
            read: false,
            created_at: self.clock.utc(),
        };
        self.messages
            .create_message(&message)
            .await
            .map_err(map_repository_error)?;
        debug!(message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Mark a received message read. Messages the caller did not receive
    /// are left untouched without error.
    pub async fn mark_read(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<(), Error> {
        let changed = self
            .messages
            .mark_read(&id, &caller.id)
            .await
            .map_err(map_repository_error)?;
        debug!(message_id = %id, changed, "mark read");
        Ok(())
    }

    /// Number of unread messages for the caller.
    pub async fn unread_count(&self, caller: &AuthenticatedUser) -> Result<UnreadCount, Error> {
        let unread_count = self
            .messages
            .unread_count(&caller.id)
            .await
            .map_err(map_repository_error)?;
        Ok(UnreadCount { unread_count })
    }
}
