//! End-to-end processing of one webhook delivery.

use super::{
    payload::decode_body, AckResponse, EventDispatcher, EventKind, SignatureVerifier,
    WebhookError, WebhookEvent, WebhookHeaders, WebhookRequest,
};
use tracing::{info, instrument, warn};

/// Verify → classify → parse → dispatch → acknowledge.
///
/// The pipeline is immutable after construction and can be shared behind an
/// `Arc` by every request handler.
#[derive(Debug, Clone)]
pub struct WebhookPipeline {
    verifier: SignatureVerifier,
    dispatcher: EventDispatcher,
}

impl WebhookPipeline {
    /// Create a pipeline from its two configurable stages
    pub fn new(verifier: SignatureVerifier, dispatcher: EventDispatcher) -> Self {
        Self {
            verifier,
            dispatcher,
        }
    }

    /// Whether deliveries must carry a valid signature
    pub fn requires_signature(&self) -> bool {
        self.verifier.is_enabled()
    }

    /// Process one delivery.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidSignature`] when a secret is configured
    /// and the signature is missing or wrong. Nothing is parsed or dispatched
    /// in that case. Every other input yields an acknowledgment.
    pub async fn process(&self, request: &WebhookRequest) -> Result<AckResponse, WebhookError> {
        self.process_classified(request).await.1
    }

    /// Process one delivery and also return the event kind read from its
    /// headers, whether or not the delivery was accepted.
    #[instrument(skip_all, fields(event, delivery_id))]
    pub async fn process_classified(
        &self,
        request: &WebhookRequest,
    ) -> (EventKind, Result<AckResponse, WebhookError>) {
        let headers = WebhookHeaders::from_request(request);

        let span = tracing::Span::current();
        span.record("event", headers.event_kind.label());
        span.record("delivery_id", headers.delivery_id.as_str());

        if !self
            .verifier
            .verify(&request.body, headers.signature.as_deref())
        {
            warn!("Rejecting webhook with invalid signature");
            let error = WebhookError::InvalidSignature {
                delivery_id: headers.delivery_id,
            };
            return (headers.event_kind, Err(error));
        }

        info!(
            user_agent = ?headers.user_agent,
            received_at = %request.received_at,
            "GitHub event received"
        );

        let payload = decode_body(&request.body);
        let event = WebhookEvent::parse(&headers.event_kind, &payload);
        let summary = self.dispatcher.dispatch(&headers.delivery_id, &event).await;

        info!(
            commits_processed = summary.commits_processed,
            handlers_run = summary.handlers_run,
            handler_failures = summary.handler_failures,
            "Webhook dispatched"
        );

        (headers.event_kind, Ok(AckResponse::for_event(&summary.event)))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
