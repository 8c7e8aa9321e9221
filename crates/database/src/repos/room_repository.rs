//! Repository for room data access operations.

use crate::entities::Room;
use crate::types::{StoreError, StoreResult};
use sqlx::SqlitePool;
use tracing::info;

/// Repository for room database operations
#[derive(Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All rooms, newest first
    pub async fn list_all(&self) -> StoreResult<Vec<Room>> {
        sqlx::query_as::<_, Room>(
            "SELECT id, name, created_at FROM chat_rooms ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::unavailable("list rooms"))
    }

    /// Create a new room. Rooms are provisioned out of band; the public API never calls this.
    pub async fn create(&self, name: &str) -> StoreResult<Room> {
        let room = sqlx::query_as::<_, Room>(
            "INSERT INTO chat_rooms (name, created_at)
             VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::unavailable("create room"))?;

        info!(room_id = room.id, name = %room.name, "created new room");
        Ok(room)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM chat_rooms")
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::unavailable("count rooms"))
    }
}
