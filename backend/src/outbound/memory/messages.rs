//! Direct messages between users.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Message;
use crate::domain::ports::{MessageRepository, MessageRepositoryError};

use super::{MemoryStore, count, newest_first, require_references};

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Message>, MessageRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(state.messages.iter().filter(|message| {
            message.sender_id == *user_id || message.receiver_id == *user_id
        })))
    }

    async fn conversation(
        &self,
        user_id: &Uuid,
        other_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let state = self.state.lock().await;
        let mut thread = newest_first(state.messages.iter().filter(|message| {
            (message.sender_id == *user_id && message.receiver_id == *other_id)
                || (message.sender_id == *other_id && message.receiver_id == *user_id)
        }));
        thread.truncate(limit);
        Ok(thread)
    }

    async fn create_message(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[
            (state.user_exists(message.sender_id), "messages_sender_id_fkey"),
            (
                state.user_exists(message.receiver_id),
                "messages_receiver_id_fkey",
            ),
            (
                message.load_id.is_none_or(|id| state.load_exists(id)),
                "messages_load_id_fkey",
            ),
        ])?;
        state.messages.push(message.clone());
        Ok(())
    }

    async fn mark_read(
        &self,
        message_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, MessageRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(message) = state
            .messages
            .iter_mut()
            .find(|message| message.id == *message_id && message.receiver_id == *receiver_id)
        else {
            return Ok(false);
        };
        message.read = true;
        Ok(true)
    }

    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, MessageRepositoryError> {
        let state = self.state.lock().await;
        Ok(count(state.messages.iter().filter(|message| {
            message.receiver_id == *user_id && !message.read
        })))
    }
}
