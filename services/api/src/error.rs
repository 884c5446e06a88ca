//! Error taxonomy for the Scoutbase API
//!
//! Every failure a handler can produce is one of these variants. Store-level
//! errors are translated at the repository boundary; raw database error text
//! is logged here and never echoed to a client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error taxonomy
#[derive(Error, Debug)]
pub enum ApiError {
    /// The username uniqueness invariant would be violated
    #[error("username is already taken")]
    DuplicateUsername,

    /// The email uniqueness invariant would be violated
    #[error("email is already registered")]
    DuplicateEmail,

    /// Password verification failed for an existing account
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The requested record does not exist
    #[error("record not found")]
    NotFound,

    /// A request field failed validation before any store round trip
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// An update write affected no rows after the record was seen to exist
    #[error("update affected no rows")]
    UpdateFailed,

    /// The operation requires a signed-in principal
    #[error("authentication required")]
    Unauthenticated,

    /// The signed-in principal's role is not allowed here
    #[error("insufficient role")]
    Forbidden,

    /// Too many attempts from the same identifier
    #[error("too many attempts, try again later")]
    RateLimited,

    /// Connection-level store failure
    #[error("backing store unavailable")]
    StoreUnavailable(String),

    /// Any other database error; detail is logged, not returned
    #[error("database error")]
    Database(#[source] sqlx::Error),

    /// Unexpected internal failure (hashing, serialization)
    #[error("internal error")]
    Internal(String),
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // The store's unique constraints are the authority on duplicates;
        // a violation at insert time is the canonical duplicate signal.
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                match db.constraint() {
                    Some("users_username_key") => return ApiError::DuplicateUsername,
                    Some("users_email_key") => return ApiError::DuplicateEmail,
                    _ => {}
                }
            }
        }

        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ApiError::StoreUnavailable(e.to_string())
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<common::error::InfraError> for ApiError {
    fn from(e: common::error::InfraError) -> Self {
        ApiError::StoreUnavailable(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::DuplicateUsername | ApiError::DuplicateEmail => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::InvalidCredentials | ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ApiError::StoreUnavailable(detail) => {
                error!("store unavailable: {}", detail);
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ApiError::Database(e) => {
                error!("database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::UpdateFailed => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Internal(detail) => {
                error!("internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}
