use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can return. Authentication and ownership
/// failures carry no detail; input failures name the offending field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Caller is authenticated but the record is not theirs, or does not exist.
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidInput { .. } | AppError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::InvalidInput { field, message } => {
                json!({ "error": message, "field": field })
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                json!({ "error": "internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
