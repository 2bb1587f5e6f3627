//! Typed error handling for the tally service
//!
//! Every handler failure is expressed as a [`TallyError`] and translated to
//! an HTTP response at a single boundary (the `IntoResponse` impl). Handlers
//! perform no local recovery: they propagate with `?` and let the boundary
//! do the status mapping.
//!
//! # Error Categories
//!
//! - `NotFound`: a primary-key lookup, update, or delete matched zero rows
//! - `Conflict`: a uniqueness constraint was violated (duplicate company or
//!   industry code, duplicate association pair)
//! - `Invalid`: the request references a missing foreign key, violates a
//!   check constraint, or carries an unusable body
//! - `Storage`: the database failed in a way the client cannot fix
//! - `Config`: the service was misconfigured at startup

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the tally service
#[derive(Debug, Error)]
pub enum TallyError {
    /// A keyed lookup, update, or delete matched zero rows
    #[error("no such {resource}: {key}")]
    NotFound {
        resource: &'static str,
        key: String,
    },

    /// A uniqueness constraint rejected the write
    #[error("{resource} '{key}' already exists")]
    Conflict {
        resource: &'static str,
        key: String,
    },

    /// The request is well-formed JSON but unusable (missing foreign key,
    /// constraint violation, bad field value)
    #[error("invalid request: {message}")]
    Invalid { message: String },

    /// The storage backend failed
    #[error("storage error: {message}")]
    Storage { message: String },

    /// The service configuration is unusable
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl TallyError {
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        TallyError::NotFound {
            resource,
            key: key.into(),
        }
    }

    pub fn conflict(resource: &'static str, key: impl Into<String>) -> Self {
        TallyError::Conflict {
            resource,
            key: key.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        TallyError::Invalid {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        TallyError::Storage {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TallyError::NotFound { .. } => StatusCode::NOT_FOUND,
            TallyError::Conflict { .. } => StatusCode::CONFLICT,
            TallyError::Invalid { .. } => StatusCode::BAD_REQUEST,
            TallyError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TallyError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TallyError::NotFound { .. } => "NOT_FOUND",
            TallyError::Conflict { .. } => "CONFLICT",
            TallyError::Invalid { .. } => "INVALID",
            TallyError::Storage { .. } => "STORAGE_ERROR",
            TallyError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Convert to the wire representation
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            // Internal failures keep their detail in the logs, not the body.
            TallyError::Storage { .. } | TallyError::Config { .. } => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code().to_string(),
                message,
            },
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for TallyError {
    fn into_response(self) -> Response {
        if let TallyError::Storage { message } | TallyError::Config { message } = &self {
            tracing::error!(%message, "request failed");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for TallyError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            // PostgreSQL SQLSTATE classes: 23505 unique_violation,
            // 23503 foreign_key_violation, 23514 check_violation.
            match db.code().as_deref() {
                Some("23505") => {
                    return TallyError::Conflict {
                        resource: "record",
                        key: db.constraint().unwrap_or("unique constraint").to_string(),
                    };
                }
                Some("23503") => {
                    return TallyError::invalid(format!(
                        "referenced record does not exist ({})",
                        db.constraint().unwrap_or("foreign key")
                    ));
                }
                Some("23514") => {
                    return TallyError::invalid(format!(
                        "value rejected by {}",
                        db.constraint().unwrap_or("check constraint")
                    ));
                }
                _ => {}
            }
        }
        TallyError::Storage {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for tally operations
pub type TallyResult<T> = Result<T, TallyError>;
