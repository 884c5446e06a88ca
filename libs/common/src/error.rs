//! Error types shared by the infrastructure modules

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors produced while talking to PostgreSQL or Redis
#[derive(Error, Debug)]
pub enum InfraError {
    /// Failed to establish a database connection
    #[error("database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Applying embedded migrations failed
    #[error("database migration error: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// The Redis session store is unreachable or returned an error
    #[error("session store error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A required setting is missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with InfraError
pub type InfraResult<T> = Result<T, InfraError>;
