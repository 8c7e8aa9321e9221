//! # Incognito Gateway Crate
//!
//! HTTP REST and WebSocket surface of the chat relay.
//!
//! ## Architecture
//!
//! - **REST**: health probe, room listing, message history and submission
//! - **WebSocket**: `/ws` push channel with `join_room` / `leave_room` membership
//! - **State**: pool, room registry and message service shared by all handlers
//! - **Middleware**: request logging and the per-environment CORS policy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use incognito_gateway::{create_router, GatewayState};
//!
//! # async fn run(pool: sqlx::SqlitePool, config: incognito_config::AppConfig) {
//! let state = GatewayState::new(pool, &config);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod docs;
pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod websocket;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::GatewayState;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let cors = middleware::create_cors_middleware(state.environment, &state.cors);
    let arc_state = Arc::new(state);

    let mut router = Router::new()
        .merge(rest::create_rest_routes().with_state(arc_state.clone()))
        .merge(websocket::create_websocket_routes().with_state(arc_state))
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    router.layer(axum_middleware::from_fn(middleware::logging_middleware))
}
