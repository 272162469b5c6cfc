//! Typed webhook events parsed from GitHub payloads.
//!
//! Parsing never fails. Each field has a documented default that is used
//! when the payload omits it or carries an unexpected type.

use super::classify::EventKind;
use super::payload::{array_or_empty, opt_str, opt_u64, str_or};
use serde_json::Value;

/// Prefix stripped from a push `ref` to obtain the branch name
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Number of characters kept from a commit ID
const SHORT_ID_LENGTH: usize = 7;

/// Placeholder for absent names
const UNKNOWN: &str = "unknown";

// ============================================================================
// Push Events
// ============================================================================

/// Push event summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// `repository.full_name`, or `"unknown"`
    pub repository: String,

    /// `ref` without the `refs/heads/` prefix, or `""`
    pub branch: String,

    /// `pusher.name`, or `"unknown"`
    pub pusher: String,

    /// Pushed commits in payload order
    pub commits: Vec<CommitSummary>,
}

impl PushEvent {
    /// Extract a push summary from a payload
    pub fn from_payload(payload: &Value) -> Self {
        let git_ref = str_or(payload, &["ref"], "");
        let branch = git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref);

        Self {
            repository: str_or(payload, &["repository", "full_name"], UNKNOWN).to_string(),
            branch: branch.to_string(),
            pusher: str_or(payload, &["pusher", "name"], UNKNOWN).to_string(),
            commits: array_or_empty(payload, &["commits"])
                .iter()
                .map(CommitSummary::from_payload)
                .collect(),
        }
    }
}

/// One commit from a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// First seven characters of `id` (fewer if the ID is shorter)
    pub short_id: String,

    /// Commit message, or `""`
    pub message: String,
}

impl CommitSummary {
    /// Extract a commit summary; non-object entries yield empty fields
    pub fn from_payload(commit: &Value) -> Self {
        Self {
            short_id: str_or(commit, &["id"], "")
                .chars()
                .take(SHORT_ID_LENGTH)
                .collect(),
            message: str_or(commit, &["message"], "").to_string(),
        }
    }
}

// ============================================================================
// Ping Events
// ============================================================================

/// Ping sent by GitHub when a webhook is created. Carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingEvent;

// ============================================================================
// Pull Request Events
// ============================================================================

/// Pull request event summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// `action`, or `"unknown"`
    pub action: String,

    /// `pull_request.number`, if present
    pub number: Option<u64>,

    /// `pull_request.title`, if present
    pub title: Option<String>,
}

impl PullRequestEvent {
    /// Extract a pull request summary from a payload
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            action: str_or(payload, &["action"], UNKNOWN).to_string(),
            number: opt_u64(payload, &["pull_request", "number"]),
            title: opt_str(payload, &["pull_request", "title"]),
        }
    }
}

// ============================================================================
// WebhookEvent
// ============================================================================

/// A parsed webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    Push(PushEvent),
    Ping(PingEvent),
    PullRequest(PullRequestEvent),
    Unknown { label: String },
}

impl WebhookEvent {
    /// Parse `payload` according to `kind`. Never fails.
    pub fn parse(kind: &EventKind, payload: &Value) -> Self {
        match kind {
            EventKind::Push => Self::Push(PushEvent::from_payload(payload)),
            EventKind::Ping => Self::Ping(PingEvent),
            EventKind::PullRequest => Self::PullRequest(PullRequestEvent::from_payload(payload)),
            EventKind::Unknown(raw) => Self::Unknown { label: raw.clone() },
        }
    }

    /// Kind this event was parsed as
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Push(_) => EventKind::Push,
            Self::Ping(_) => EventKind::Ping,
            Self::PullRequest(_) => EventKind::PullRequest,
            Self::Unknown { label } => EventKind::Unknown(label.clone()),
        }
    }

    /// Label echoed in acknowledgments and logs
    pub fn label(&self) -> &str {
        match self {
            Self::Push(_) => "push",
            Self::Ping(_) => "ping",
            Self::PullRequest(_) => "pull_request",
            Self::Unknown { label } => label,
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
