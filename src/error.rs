use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::license::LicenseError;

/// Body returned for every failed request: `{"success": false, "message": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("2FA is not set up")]
    NotSetUp,

    #[error("2FA is not enabled")]
    NotEnabled,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid 2FA code")]
    InvalidCode,

    #[error(transparent)]
    Upstream(#[from] LicenseError),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotSetUp => StatusCode::BAD_REQUEST,
            Self::NotEnabled => StatusCode::BAD_REQUEST,
            Self::InvalidPassword => StatusCode::UNAUTHORIZED,
            Self::InvalidCode => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client. Storage and internal
    /// failures only get a short generic text; the detail goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "Database error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}
