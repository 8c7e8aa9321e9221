//! Error types for the database layer

use thiserror::Error;

/// Failures while bringing the database up
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Failures of the store itself while serving requests.
///
/// Absence is never an error here: unknown rooms simply produce empty results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable during {operation}: {source}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Adapter for `map_err` that tags a query failure with the operation name.
    pub fn unavailable(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Unavailable { operation, source }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Unavailable { operation, .. } => operation,
        }
    }
}
