//! Room listing endpoint

use axum::{extract::State, routing::get, Json, Router};
use incognito_database::Room;
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::state::GatewayState;

pub fn create_room_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/rooms", get(list_rooms))
}

/// List all rooms, newest first
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "rooms",
    responses(
        (status = 200, description = "All rooms, newest first", body = [Room]),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_rooms(State(state): State<Arc<GatewayState>>) -> GatewayResult<Json<Vec<Room>>> {
    let rooms = state.message_service().list_rooms().await?;
    Ok(Json(rooms))
}
