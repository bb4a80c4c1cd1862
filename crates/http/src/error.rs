//! Error envelope shared by every catalog endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

const HIDDEN_INTERNAL_MESSAGE: &str = "An internal server error occurred";

/// Body of `{"error": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Vec<Value>,
    pub trace_id: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed field-level validation; `details` lists each violation.
    #[error("{message}")]
    Validation { message: String, details: Vec<Value> },

    #[error("{0}")]
    NotFound(String),

    /// Malformed request or a rule the payload broke outside field validation.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(details: Vec<Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in the envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4().to_string();
        let status = self.status();
        let code = self.code();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let (message, details) = match self {
            Self::Validation { message, details } => (message, details),
            Self::NotFound(message) | Self::BadRequest(message) => (message, Vec::new()),
            Self::Internal(source) => (format!("{source:#}"), Vec::new()),
        };

        if status.is_server_error() {
            tracing::error!(%trace_id, code, status = status.as_u16(), %message, "request failed");
        } else {
            tracing::warn!(%trace_id, code, status = status.as_u16(), %message, "request rejected");
        }

        // release builds keep internal causes in the logs only
        let message = if cfg!(not(debug_assertions)) && status.is_server_error() {
            HIDDEN_INTERNAL_MESSAGE.to_string()
        } else {
            message
        };

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code,
                message,
                details,
                trace_id,
                timestamp,
            },
        };

        (status, Json(envelope)).into_response()
    }
}
