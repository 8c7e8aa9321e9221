//! Repository for message authors.

use crate::entities::User;
use crate::types::{StoreError, StoreResult};
use sqlx::SqlitePool;
use tracing::info;

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, username: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, created_at)
             VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             RETURNING id, username, created_at",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::unavailable("create user"))?;

        info!(user_id = user.id, username = %user.username, "created new user");
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::unavailable("find user"))
    }
}
