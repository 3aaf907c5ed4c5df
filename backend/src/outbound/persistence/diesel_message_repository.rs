//! PostgreSQL-backed `MessageRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Message;
use crate::domain::ports::{MessageRepository, MessageRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::MessageRow;
use super::pool::DbPool;
use super::schema::messages;

/// Diesel-backed implementation of the `MessageRepository` port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MessageRow> = messages::table
            .filter(
                messages::sender_id
                    .eq(user_id)
                    .or(messages::receiver_id.eq(user_id)),
            )
            .order(messages::created_at.desc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn conversation(
        &self,
        user_id: &Uuid,
        other_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MessageRow> = messages::table
            .filter(
                (messages::sender_id.eq(user_id).and(messages::receiver_id.eq(other_id))).or(
                    messages::sender_id
                        .eq(other_id)
                        .and(messages::receiver_id.eq(user_id)),
                ),
            )
            .order(messages::created_at.desc())
            .limit(limit)
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn create_message(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(messages::table)
            .values(&MessageRow::from(message))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn mark_read(
        &self,
        message_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<bool, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            messages::table
                .filter(messages::id.eq(message_id))
                .filter(messages::receiver_id.eq(receiver_id)),
        )
        .set(messages::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn unread_count(&self, user_id: &Uuid) -> Result<i64, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        messages::table
            .filter(messages::receiver_id.eq(user_id))
            .filter(messages::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
