//! Error types for room services

use incognito_database::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Name of the store operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            ServiceError::Store(error) => error.operation(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
