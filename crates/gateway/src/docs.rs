//! OpenAPI description of the REST surface

use axum::Json;
use incognito_database::{Message, MessageWithAuthor, Room};
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::health::health_check,
        rest::room::list_rooms,
        rest::message::list_messages,
        rest::message::create_message,
    ),
    components(
        schemas(
            rest::health::HealthResponse,
            rest::message::CreateMessageRequest,
            Room,
            Message,
            MessageWithAuthor,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "rooms", description = "Chat rooms"),
        (name = "messages", description = "Room history and submission"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
