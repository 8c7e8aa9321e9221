//! Message entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A persisted room message. There is no edit or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: i64,
    pub room_id: i64,
    pub user_id: Option<i64>,
    /// Stored exactly as submitted, including empty or missing content.
    pub content: Option<String>,
    pub is_anonymous: bool,
    /// RFC 3339 UTC timestamp assigned by the store at insert time.
    pub created_at: String,
}

/// A message joined with its author's display name, when it has an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MessageWithAuthor {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub message: Message,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub room_id: i64,
    pub user_id: Option<i64>,
    pub content: Option<String>,
    pub is_anonymous: bool,
}

impl CreateMessageRequest {
    /// An unauthored message, the only kind the public API can create.
    pub fn unauthored(room_id: i64, content: Option<String>, is_anonymous: bool) -> Self {
        Self {
            room_id,
            user_id: None,
            content,
            is_anonymous,
        }
    }
}
