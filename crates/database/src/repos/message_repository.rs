//! Repository for message data access operations.

use crate::entities::{CreateMessageRequest, Message, MessageWithAuthor};
use crate::types::{StoreError, StoreResult};
use sqlx::SqlitePool;
use tracing::info;

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Messages of a room in chronological order, joined with author names.
    ///
    /// The room itself is not looked up: an unknown room yields an empty list.
    pub async fn find_by_room(&self, room_id: i64) -> StoreResult<Vec<MessageWithAuthor>> {
        sqlx::query_as::<_, MessageWithAuthor>(
            "SELECT m.id, m.room_id, m.user_id, m.content, m.is_anonymous, m.created_at, u.username
             FROM messages m
             LEFT JOIN users u ON m.user_id = u.id
             WHERE m.room_id = ?
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::unavailable("list messages"))
    }

    /// Append a message; the store assigns the id and the timestamp.
    pub async fn create(&self, request: &CreateMessageRequest) -> StoreResult<Message> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (content, room_id, user_id, is_anonymous, created_at)
             VALUES (?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             RETURNING id, room_id, user_id, content, is_anonymous, created_at",
        )
        .bind(&request.content)
        .bind(request.room_id)
        .bind(request.user_id)
        .bind(request.is_anonymous)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::unavailable("create message"))?;

        info!(
            message_id = message.id,
            room_id = message.room_id,
            is_anonymous = message.is_anonymous,
            "created new message"
        );

        Ok(message)
    }
}
