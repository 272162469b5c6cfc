//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use ci_webhook_core::webhook::WebhookError;
use tracing::warn;

/// Webhook handler errors with HTTP status code mapping
///
/// Only authentication can fail a delivery. Malformed payloads and unknown
/// event kinds are acknowledged with `200 OK` by the pipeline itself.
///
/// The response body is `{"error", "status", "timestamp"}` and never echoes
/// the submitted signature.
#[derive(Debug, thiserror::Error)]
pub enum WebhookHandlerError {
    /// Signature missing or wrong while a secret is configured
    ///
    /// Maps to: `401 Unauthorized` (permanent, GitHub will not succeed on retry)
    #[error("Webhook signature verification failed")]
    Unauthorized(#[from] WebhookError),
}

impl WebhookHandlerError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for WebhookHandlerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Unauthorized(WebhookError::InvalidSignature { delivery_id }) => {
                warn!(delivery_id = %delivery_id, "Rejected unauthenticated webhook");
            }
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl ServiceError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BindFailed { .. } => 1,
            Self::ServerFailed { .. } => 2,
            Self::Configuration(_) => 3,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
