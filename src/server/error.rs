use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Username already registered")]
    UsernameTaken,
    #[error("Unknown user id {0}")]
    UnknownUser(i64),
    #[error("Completion backend failed")]
    Completion(#[from] CompletionError),
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UsernameTaken => StatusCode::BAD_REQUEST,
            ApiError::UnknownUser(_) => StatusCode::NOT_FOUND,
            ApiError::Completion(error) => {
                tracing::error!(%error, "upstream completion call failed");
                StatusCode::BAD_GATEWAY
            }
            // A registration that loses the check-then-insert race hits the
            // unique constraint instead of the username lookup.
            ApiError::Database(error) if is_unique_violation(error) => StatusCode::BAD_REQUEST,
            ApiError::Database(error) => {
                tracing::error!(%error, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
