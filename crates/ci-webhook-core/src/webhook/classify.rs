//! Event classification from GitHub webhook headers.

use super::{
    WebhookRequest, DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER, USER_AGENT_HEADER,
};
use crate::DeliveryId;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Label used when the event header is absent.
const UNKNOWN_EVENT: &str = "unknown";

// ============================================================================
// EventKind
// ============================================================================

/// Kind of webhook event, derived from the `X-GitHub-Event` header.
///
/// Anything outside the handled kinds is kept verbatim in
/// [`EventKind::Unknown`] so it can be echoed back and logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    Ping,
    PullRequest,
    Unknown(String),
}

impl EventKind {
    /// Classify a raw header value. Never fails.
    pub fn from_header(value: &str) -> Self {
        match value {
            "push" => Self::Push,
            "ping" => Self::Ping,
            "pull_request" => Self::PullRequest,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Label echoed in acknowledgments and logs
    pub fn label(&self) -> &str {
        match self {
            Self::Push => "push",
            Self::Ping => "ping",
            Self::PullRequest => "pull_request",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this kind has a dedicated handler
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_header(s))
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ============================================================================
// WebhookHeaders
// ============================================================================

/// GitHub-specific HTTP headers relevant to processing
///
/// Classification always succeeds: a missing event header yields
/// `Unknown("unknown")` and a missing delivery header yields the
/// [`DeliveryId::UNKNOWN`] placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub event_kind: EventKind,      // X-GitHub-Event
    pub delivery_id: DeliveryId,    // X-GitHub-Delivery
    pub signature: Option<String>,  // X-Hub-Signature-256
    pub user_agent: Option<String>, // User-Agent
}

impl WebhookHeaders {
    /// Classify headers from a name→value mapping. Names match case-insensitively.
    pub fn from_http_headers(headers: &HashMap<String, String>) -> Self {
        let event_kind =
            EventKind::from_header(find_header(headers, EVENT_HEADER).unwrap_or(UNKNOWN_EVENT));

        let delivery_id = find_header(headers, DELIVERY_HEADER)
            .map(DeliveryId::new)
            .unwrap_or_default();

        Self {
            event_kind,
            delivery_id,
            signature: find_header(headers, SIGNATURE_HEADER).map(str::to_string),
            user_agent: find_header(headers, USER_AGENT_HEADER).map(str::to_string),
        }
    }

    /// Classify the headers of a [`WebhookRequest`]
    pub fn from_request(request: &WebhookRequest) -> Self {
        Self::from_http_headers(request.headers())
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
