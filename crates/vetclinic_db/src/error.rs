//! Error types for the database client

use thiserror::Error;
use tracing::error;
use vetclinic_common::VetClinicError;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// A stored value could not be decoded into its model
    #[error("Database decode error: {0}")]
    DecodeError(String),
}

impl DbError {
    /// `true` when a UNIQUE constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::SqlxError(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

/// Logs a failed query and wraps it, for use with `map_err`.
pub(crate) fn query_failed(context: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| {
        error!("Failed to {}: {}", context, e);
        DbError::SqlxError(e)
    }
}

impl From<DbError> for VetClinicError {
    fn from(err: DbError) -> Self {
        if err.is_unique_violation() {
            return VetClinicError::ConflictError("Resource already exists".to_string());
        }
        match err {
            DbError::ConfigError(msg) => VetClinicError::ConfigError(msg),
            other => VetClinicError::DatabaseError(other.to_string()),
        }
    }
}
