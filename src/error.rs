use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalError,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// True when the underlying database error is a unique-constraint
    /// violation, so callers can surface a conflict instead of a 500.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(sqlx::Error::Database(e)) if e.is_unique_violation()
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
            AppError::Authentication(ref msg) => (StatusCode::UNAUTHORIZED, msg.as_str()),
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.as_str()),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.as_str()),
            AppError::UnknownUser(user_id) => {
                // A notification target that does not exist means the caller
                // worked from stale or corrupt domain state.
                tracing::error!("Dispatch target {} does not exist", user_id);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Conflict(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_are_not_unique_violations() {
        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_unique_violation());
        assert!(!AppError::Conflict("User exists".to_string()).is_unique_violation());
        assert!(!AppError::NotFound("x".to_string()).is_unique_violation());
    }
}
