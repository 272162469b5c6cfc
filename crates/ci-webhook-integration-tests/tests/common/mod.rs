//! Common test utilities for ci-webhook-api integration tests
//!
//! This module provides:
//! - A recording [`EventHandler`] for observing dispatch side effects
//! - Router builders with and without a webhook secret
//! - Request and response helpers

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use ci_webhook_api::{create_router, AppState, ServiceConfig, ServiceMetrics};
use ci_webhook_core::{
    webhook::{
        compute_signature, EventDispatcher, EventHandler, HandlerError, SignatureVerifier,
        WebhookEvent, WebhookPipeline, WebhookSecret,
    },
    DeliveryId,
};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "It's a Secret to Everybody";

// ============================================================================
// Recording Handler
// ============================================================================

/// Records every event dispatched to it
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingHandler {
    events: Mutex<Vec<(DeliveryId, WebhookEvent)>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn events(&self) -> Vec<(DeliveryId, WebhookEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    fn name(&self) -> &str {
        "recording"
    }

    async fn handle(
        &self,
        delivery_id: &DeliveryId,
        event: &WebhookEvent,
    ) -> Result<(), HandlerError> {
        self.events
            .lock()
            .unwrap()
            .push((delivery_id.clone(), event.clone()));
        Ok(())
    }
}

// ============================================================================
// App Builders
// ============================================================================

/// Application with the given secret and a recording handler attached
#[allow(dead_code)]
pub fn create_test_app(
    secret: Option<&str>,
) -> (Router, Arc<RecordingHandler>, Arc<ServiceMetrics>) {
    let mut config = ServiceConfig::default();
    config.webhooks.secret = secret.map(|s| WebhookSecret::new(s).unwrap());

    let handler = Arc::new(RecordingHandler::default());
    let pipeline = WebhookPipeline::new(
        SignatureVerifier::new(config.webhooks.secret.clone()),
        EventDispatcher::new().with_handler(handler.clone()),
    );
    let metrics = ServiceMetrics::new().unwrap();

    let state = AppState::new(config, Arc::new(pipeline), metrics.clone());
    (create_router(state), handler, metrics)
}

/// Application without signature verification
#[allow(dead_code)]
pub fn create_open_app() -> Router {
    create_test_app(None).0
}

// ============================================================================
// Request Helpers
// ============================================================================

/// POST to the default webhook endpoint
#[allow(dead_code)]
pub fn webhook_request(event: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/github-webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event)
        .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
        .header("user-agent", "GitHub-Hookshot/044aadd")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST to the default webhook endpoint with a signature header
#[allow(dead_code)]
pub fn signed_webhook_request(event: &str, body: &str, signature: &str) -> Request<Body> {
    let mut request = webhook_request(event, body);
    request
        .headers_mut()
        .insert("x-hub-signature-256", signature.parse().unwrap());
    request
}

/// Signature for `body` under [`TEST_SECRET`]
#[allow(dead_code)]
pub fn sign(body: &str) -> String {
    compute_signature(body.as_bytes(), &WebhookSecret::new(TEST_SECRET).unwrap()).unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// ============================================================================
// Payload Fixtures
// ============================================================================

#[allow(dead_code)]
pub const PUSH_PAYLOAD: &str = r#"{
    "ref": "refs/heads/main",
    "repository": {"full_name": "o/r"},
    "pusher": {"name": "alice"},
    "commits": [
        {"id": "abcdef1234", "message": "fix bug"}
    ]
}"#;

#[allow(dead_code)]
pub const PULL_REQUEST_PAYLOAD: &str = r#"{
    "action": "opened",
    "number": 42,
    "pull_request": {"number": 42, "title": "Add CI"}
}"#;
