use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::common::auth::AuthError;
use crate::domains::pets::PetStatus;

/// Error taxonomy of the adoption workflow.
///
/// None of these trigger a retry inside the engine; every kind is terminal
/// for the current attempt and the transaction it aborted left no partial
/// writes behind.
#[derive(Error, Debug)]
pub enum AdoptionError {
    /// Malformed or out-of-range input (short reason, self-request, ...)
    #[error("{0}")]
    Validation(String),

    /// Someone else got there first, or the target is already resolved
    #[error("{0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Permission(#[from] AuthError),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The bounded wait for the pet row lock expired
    #[error("timed out waiting for the pet record")]
    LockTimeout,

    /// A status write the transition table forbids - a bug, not a user error
    #[error("invalid pet status transition: {from} -> {to}")]
    InvalidTransition { from: PetStatus, to: PetStatus },

    #[error(transparent)]
    Database(sqlx::Error),
}

impl AdoptionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdoptionError::Validation(_) => StatusCode::BAD_REQUEST,
            AdoptionError::Conflict(_) => StatusCode::CONFLICT,
            AdoptionError::Permission(AuthError::AuthenticationRequired)
            | AdoptionError::Permission(AuthError::InvalidToken) => StatusCode::UNAUTHORIZED,
            AdoptionError::Permission(_) => StatusCode::FORBIDDEN,
            AdoptionError::NotFound(_) => StatusCode::NOT_FOUND,
            AdoptionError::LockTimeout => StatusCode::SERVICE_UNAVAILABLE,
            AdoptionError::InvalidTransition { .. } | AdoptionError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable kind for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            AdoptionError::Validation(_) => "validation",
            AdoptionError::Conflict(_) => "conflict",
            AdoptionError::Permission(_) => "permission",
            AdoptionError::NotFound(_) => "not_found",
            AdoptionError::LockTimeout => "timeout",
            AdoptionError::InvalidTransition { .. } | AdoptionError::Database(_) => "internal",
        }
    }
}

impl From<sqlx::Error> for AdoptionError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AdoptionError::NotFound("record");
        }

        let code = match &err {
            sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
            _ => None,
        };

        match code.as_deref() {
            // lock_not_available: the bounded lock wait expired
            Some("55P03") => AdoptionError::LockTimeout,
            // unique_violation: the partial pending index caught a duplicate
            // the in-transaction check could not see
            Some("23505") => AdoptionError::Conflict("duplicate pending request"),
            _ => AdoptionError::Database(err),
        }
    }
}

impl IntoResponse for AdoptionError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs, not the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message, "kind": self.kind() }))).into_response()
    }
}
