//! Message history and submission endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use incognito_database::{Message, MessageWithAuthor};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Body of a message submission. Every field is optional, and a missing body
/// is the same as `{}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
    /// Defaults to true when absent or null
    #[serde(default, rename = "isAnonymous", alias = "is_anonymous")]
    pub is_anonymous: Option<bool>,
}

pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new().route(
        "/api/rooms/:room_id/messages",
        get(list_messages).post(create_message),
    )
}

/// List a room's messages, oldest first
#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/messages",
    tag = "messages",
    params(
        ("room_id" = i64, Path, description = "Room identifier")
    ),
    responses(
        (status = 200, description = "Messages of the room, oldest first", body = [MessageWithAuthor]),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_messages(
    State(state): State<Arc<GatewayState>>,
    Path(room_id): Path<i64>,
) -> GatewayResult<Json<Vec<MessageWithAuthor>>> {
    let messages = state.message_service().list_messages(room_id).await?;
    Ok(Json(messages))
}

/// Submit a message and push it to the room's live members
#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/messages",
    tag = "messages",
    params(
        ("room_id" = i64, Path, description = "Room identifier")
    ),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message stored and broadcast", body = Message),
        (status = 400, description = "Body is not a valid submission", body = crate::error::ErrorResponse),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_message(
    State(state): State<Arc<GatewayState>>,
    Path(room_id): Path<i64>,
    body: Bytes,
) -> GatewayResult<(StatusCode, Json<Message>)> {
    let request = parse_create_request(&body)?;
    let (message, _report) = state
        .message_service()
        .submit_message(room_id, request.content, request.is_anonymous.unwrap_or(true))
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// Parse a submission body regardless of its content type.
fn parse_create_request(body: &[u8]) -> GatewayResult<CreateMessageRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateMessageRequest::default());
    }

    serde_json::from_slice(body).map_err(|err| GatewayError::InvalidRequest(err.to_string()))
}
