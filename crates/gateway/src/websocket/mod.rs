//! WebSocket endpoints for the gateway

pub mod room;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws", get(room::room_websocket_handler))
}

pub use room::*;
