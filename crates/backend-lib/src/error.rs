// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use authgate_common::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::TokenError;
use crate::storage::StoreError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User already exists")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            },
            AppError::MissingToken | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::Conflict => "AUTH_004",
            AppError::MissingToken => "AUTH_005",
            AppError::InvalidToken(_) => "AUTH_006",
            AppError::Unexpected(_) => "INT_001",
        }
    }

    /// Message sent to the client. Never contains internal detail.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict => "User already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::MissingToken => "Missing session token".to_string(),
            AppError::InvalidToken(_) => "Invalid session token".to_string(),
            AppError::Unexpected(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unexpected(detail) = &self {
            tracing::error!(error = %detail, "request failed unexpectedly");
        }

        let body = ErrorBody {
            code: self.error_code().to_string(),
            message: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Conflict,
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(e) => AppError::Unexpected(format!("token signing failed: {e}")),
            rejected => AppError::InvalidToken(rejected.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Unexpected(format!("blocking task failed: {err}"))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Unexpected(format!("{err:#}"))
    }
}
