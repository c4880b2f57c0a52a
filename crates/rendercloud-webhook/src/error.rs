//! Error types for the webhook crate.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Webhook error type.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Render API call failed.
    #[error(transparent)]
    Client(#[from] rendercloud_client::Error),

    /// Subscription creation failed.
    #[error("Failed to create Render webhook: {0}")]
    CreateFailed(String),

    /// Trigger settings are incomplete or invalid.
    #[error("Invalid trigger settings: {0}")]
    InvalidSettings(String),

    /// Event name outside the supported set.
    #[error("Unknown webhook event: {0}")]
    UnknownEvent(String),

    /// Subscription state could not be read or written.
    #[error("State store error: {0}")]
    Store(String),

    /// Malformed delivery.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Receiver failed to start or serve.
    #[error("Server error: {0}")]
    Server(String),
}

impl From<std::io::Error> for WebhookError {
    fn from(e: std::io::Error) -> Self {
        WebhookError::Store(format!("IO error: {}", e))
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(e: serde_json::Error) -> Self {
        WebhookError::Store(format!("Serialization error: {}", e))
    }
}

/// Result type for webhook operations.
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            WebhookError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            WebhookError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = %status, code, error = %message, "Receiver error");
        } else {
            tracing::warn!(status = %status, code, error = %message, "Rejected delivery");
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_failed_message() {
        let err = WebhookError::CreateFailed("API error (400): bad url".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to create Render webhook: API error (400): bad url"
        );
    }

    #[test]
    fn test_status_codes() {
        let resp = WebhookError::BadRequest("not json".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = WebhookError::Store("disk full".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
