//! Shared application state for the gateway

use std::sync::Arc;

use incognito_config::{AppConfig, CorsConfig, Environment};
use incognito_database::{MessageRepository, RoomRepository};
use incognito_rooms::{Broadcaster, MessageService, RoomRegistry};
use sqlx::SqlitePool;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Room membership of live push-channel connections
    pub registry: Arc<RoomRegistry>,
    /// Room and message operations
    pub message_service: Arc<MessageService>,
    /// Deployment mode, decides the CORS policy
    pub environment: Environment,
    pub cors: CorsConfig,
}

impl GatewayState {
    /// Wire the registry, dispatcher and message service around an initialised pool
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new(config.realtime.outbound_buffer));
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let message_service = Arc::new(MessageService::new(
            RoomRepository::new(pool.clone()),
            MessageRepository::new(pool.clone()),
            broadcaster,
        ));

        Self {
            pool,
            registry,
            message_service,
            environment: config.environment,
            cors: config.cors.clone(),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn message_service(&self) -> &MessageService {
        &self.message_service
    }
}
