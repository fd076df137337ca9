//! HTTP error mapping
//!
//! Every handler error becomes a JSON body of the form
//! `{"error": <code>, "message": <text>, "details": [..]}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("{0}")]
    Storage(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation { .. } => "validation_error",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<taskdesk_core::Error> for ApiError {
    fn from(error: taskdesk_core::Error) -> Self {
        use taskdesk_core::Error;

        match error {
            Error::NotFound { .. } => Self::NotFound(error.to_string()),
            Error::Validation { ref details, .. } => Self::Validation {
                message: error.to_string(),
                details: details.clone(),
            },
            Error::Io(_) | Error::Serialization(_) | Error::Storage(_) => {
                Self::Storage(error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Storage(message) => tracing::error!("Storage failure: {}", message),
            other => tracing::debug!(status = status.as_u16(), "Request rejected: {}", other),
        }

        let code = self.code();
        let (message, details) = match self {
            Self::Validation { message, details } => (message, details),
            Self::NotFound(message) | Self::Storage(message) => (message, Vec::new()),
        };

        (
            status,
            Json(ErrorResponse {
                error: code,
                message,
                details,
            }),
        )
            .into_response()
    }
}
