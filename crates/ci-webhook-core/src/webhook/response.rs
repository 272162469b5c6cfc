//! Uniform acknowledgment returned for every accepted delivery.

use serde::{Deserialize, Serialize};

/// Acknowledgment body.
///
/// Serializes as `{"status":"success","event":"<label>","message":"GitHub <label> event received!"}`
/// with fields in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub status: String,
    pub event: String,
    pub message: String,
}

impl AckResponse {
    /// Fixed status value
    pub const SUCCESS: &'static str = "success";

    /// Build the acknowledgment for an event label
    pub fn for_event(label: &str) -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
            event: label.to_string(),
            message: format!("GitHub {label} event received!"),
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
