//! Incognito Database Crate
//!
//! The persistence boundary for rooms and messages: connection management,
//! migrations, entities and the repositories the request handlers call.

use incognito_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

pub use repos::{MessageRepository, RoomRepository, UserRepository};

pub use entities::{CreateMessageRequest, Message, MessageWithAuthor, Room, User};

pub use types::{
    errors::{DatabaseError, StoreError},
    DatabaseResult, StoreResult,
};

pub use sqlx::Pool;

/// Connect and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("test.db").display()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = initialize_database(&config).await.unwrap();
        let rooms = RoomRepository::new(pool).count().await.unwrap();
        assert_eq!(rooms, 0);
    }

    #[tokio::test]
    async fn test_unusable_path_reports_connection_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = DatabaseConfig {
            url: format!("sqlite://{}", blocker.join("chat.db").display()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let error = initialize_database(&config).await.unwrap_err();
        assert!(matches!(error, DatabaseError::ConnectionError(_)));
    }
}
