use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unexpected failure inside this service (HTTP 500).
    #[error("{message}: {details}")]
    Internal { message: String, details: String },

    /// A required integration has no usable configuration (HTTP 400).
    #[error("{message}: {details}")]
    NotConfigured { message: String, details: String },

    /// An upstream service failed (HTTP 502).
    #[error("{message}: {details}")]
    Upstream { message: String, details: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }

    pub fn not_configured(message: impl Into<String>, details: impl ToString) -> Self {
        Self::NotConfigured {
            message: message.into(),
            details: details.to_string(),
        }
    }

    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Upstream {
            message: message.into(),
            details: details.to_string(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotConfigured { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (Self::Internal { message, details }
        | Self::NotConfigured { message, details }
        | Self::Upstream { message, details }) = self;

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}
