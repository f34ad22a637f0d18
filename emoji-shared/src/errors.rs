use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Machine-readable error kinds exposed next to the human message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Unauthorized,

    // Upstream collaborators
    GenerationFailed,
    UpstreamUnavailable,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::GenerationFailed => "generation_failed",
            Self::UpstreamUnavailable => "upstream_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::GenerationFailed | Self::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Error returned by every JSON handler. Service-level errors convert into it
/// at the route boundary.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    code: ErrorCode,
    message: String,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code.code(), "{}", self.message);
        }

        (status, Json(ApiErrorResponse::new(self.message, self.code))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
