//! # CI Webhook Core
//!
//! Core logic for the CI webhook receiver: authenticating, classifying,
//! parsing and dispatching GitHub webhook notifications.
//!
//! This crate has no HTTP dependency. The HTTP endpoint converts the incoming
//! request into a [`webhook::WebhookRequest`] and hands it to a
//! [`webhook::WebhookPipeline`], which always produces either an
//! acknowledgment or a signature rejection.
//!
//! ## Usage
//!
//! ```rust
//! use bytes::Bytes;
//! use ci_webhook_core::webhook::{
//!     EventDispatcher, SignatureVerifier, WebhookPipeline, WebhookRequest,
//! };
//! use std::collections::HashMap;
//!
//! # async fn example() {
//! let pipeline = WebhookPipeline::new(SignatureVerifier::new(None), EventDispatcher::new());
//!
//! let mut headers = HashMap::new();
//! headers.insert("X-GitHub-Event".to_string(), "ping".to_string());
//! let request = WebhookRequest::new(headers, Bytes::from_static(b"{}"));
//!
//! let ack = pipeline.process(&request).await.unwrap();
//! assert_eq!(ack.event, "ping");
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod webhook;

// ============================================================================
// Domain Identifier Types
// ============================================================================

/// Provider-assigned identifier for one webhook delivery attempt.
///
/// Taken verbatim from the `X-GitHub-Delivery` header. It is only used for
/// log correlation and is never assumed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Placeholder used when the delivery header is absent.
    pub const UNKNOWN: &'static str = "unknown";

    /// Wrap a raw header value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Delivery ID used when the request carried none
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DeliveryId {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC timestamp with RFC 3339 serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Format as RFC 3339
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error type for field validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' has invalid format: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
