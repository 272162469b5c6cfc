//! Event dispatch: kind-specific logging plus pluggable handlers.

use super::classify::EventKind;
use super::events::{PullRequestEvent, PushEvent, WebhookEvent};
use crate::DeliveryId;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ============================================================================
// Handler Extension Point
// ============================================================================

/// Additional reaction to a parsed webhook event.
///
/// The dispatcher always logs each event. Implementations of this trait add
/// further side effects (for example starting a CI build for a push).
/// Nothing is registered by default.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Whether this handler wants events of `kind`
    fn handles(&self, _kind: &EventKind) -> bool {
        true
    }

    /// React to one event
    async fn handle(&self, delivery_id: &DeliveryId, event: &WebhookEvent)
        -> Result<(), HandlerError>;
}

/// Failure reported by an [`EventHandler`].
///
/// Handler failures are logged and counted but never change the
/// acknowledgment sent back to GitHub.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler '{handler}' failed: {message}")]
    Failed { handler: String, message: String },
}

// ============================================================================
// DispatchSummary
// ============================================================================

/// Outcome of dispatching one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub event: String,
    pub delivery_id: DeliveryId,
    pub commits_processed: usize,
    pub handlers_run: usize,
    pub handler_failures: usize,
}

// ============================================================================
// EventDispatcher
// ============================================================================

/// Routes parsed events to their kind-specific logging and to any
/// registered [`EventHandler`]s.
///
/// The dispatcher holds no per-request state; the same instance serves
/// concurrent requests.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Dispatcher with no extra handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional handler
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Log `event` and run every interested handler in registration order.
    #[instrument(skip_all, fields(delivery_id = %delivery_id, event = %event.label()))]
    pub async fn dispatch(
        &self,
        delivery_id: &DeliveryId,
        event: &WebhookEvent,
    ) -> DispatchSummary {
        let commits_processed = match event {
            WebhookEvent::Push(push) => log_push(push),
            WebhookEvent::Ping(_) => {
                info!("Ping received! Webhook is configured correctly.");
                0
            }
            WebhookEvent::PullRequest(pr) => {
                log_pull_request(pr);
                0
            }
            WebhookEvent::Unknown { label } => {
                info!(event = %label, "No handler for event kind; acknowledging only");
                0
            }
        };

        let kind = event.kind();
        let mut handlers_run = 0;
        let mut handler_failures = 0;

        for handler in self.handlers.iter().filter(|h| h.handles(&kind)) {
            handlers_run += 1;
            if let Err(e) = handler.handle(delivery_id, event).await {
                handler_failures += 1;
                warn!(handler = handler.name(), error = %e, "Event handler failed");
            }
        }

        DispatchSummary {
            event: event.label().to_string(),
            delivery_id: delivery_id.clone(),
            commits_processed,
            handlers_run,
            handler_failures,
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("EventDispatcher")
            .field("handlers", &names)
            .finish()
    }
}

fn log_push(push: &PushEvent) -> usize {
    info!(
        repository = %push.repository,
        branch = %push.branch,
        pusher = %push.pusher,
        commit_count = push.commits.len(),
        "Push received"
    );

    for commit in &push.commits {
        info!(short_id = %commit.short_id, message = %commit.message, "Commit");
    }

    push.commits.len()
}

fn log_pull_request(pr: &PullRequestEvent) {
    info!(
        number = ?pr.number,
        action = %pr.action,
        title = ?pr.title,
        "Pull request event received"
    );
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
