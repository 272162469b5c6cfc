//! # Webhook Processing Module
//!
//! Handles GitHub webhook authentication, classification, parsing, dispatch
//! and acknowledgment.
//!
//! The stages run in this order for every request:
//!
//! 1. [`SignatureVerifier`] checks the optional `X-Hub-Signature-256` header
//! 2. [`WebhookHeaders`] classifies the event kind and delivery ID
//! 3. [`WebhookEvent::parse`] turns the JSON body into a typed event
//! 4. [`EventDispatcher`] logs the event and runs registered handlers
//! 5. [`AckResponse`] is built from the event label
//!
//! Only stage 1 can fail. Every later stage degrades to defaults instead of
//! returning an error so that GitHub always receives a 200 for an
//! authenticated delivery.

use crate::{DeliveryId, Timestamp};
use bytes::Bytes;
use std::collections::HashMap;

mod classify;
mod dispatcher;
mod events;
pub mod payload;
mod pipeline;
mod response;
mod signature;

pub use classify::{EventKind, WebhookHeaders};
pub use dispatcher::{DispatchSummary, EventDispatcher, EventHandler, HandlerError};
pub use events::{CommitSummary, PingEvent, PullRequestEvent, PushEvent, WebhookEvent};
pub use pipeline::WebhookPipeline;
pub use response::AckResponse;
pub use signature::{compute_signature, SignatureVerifier, WebhookSecret};

// ============================================================================
// Header Names
// ============================================================================

/// Header carrying the event type
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the delivery ID
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Header carrying the HMAC-SHA256 signature of the body
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header carrying the sender's user agent
pub const USER_AGENT_HEADER: &str = "user-agent";

// ============================================================================
// Core Types
// ============================================================================

/// Raw HTTP request data from GitHub webhooks
///
/// Header names are stored lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    pub body: Bytes,
    pub received_at: Timestamp,
}

impl WebhookRequest {
    /// Create new webhook request
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self {
            headers,
            body,
            received_at: Timestamp::now(),
        }
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Lower-cased header mapping
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get signature from headers if present
    pub fn signature(&self) -> Option<&str> {
        self.header(SIGNATURE_HEADER)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Top-level error for webhook processing failures
///
/// Payload problems are never errors; they degrade to default values. The
/// only way a delivery is refused is a failed signature check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("Signature validation failed for delivery {delivery_id}")]
    InvalidSignature { delivery_id: DeliveryId },
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
