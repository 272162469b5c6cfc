//! Integration tests for webhook acknowledgment and dispatch

mod common;

use axum::http::{HeaderValue, StatusCode};
use ci_webhook_core::webhook::{AckResponse, CommitSummary, WebhookEvent};
use common::{
    body_json, body_string, create_open_app, create_test_app, webhook_request, PUSH_PAYLOAD,
    PULL_REQUEST_PAYLOAD,
};
use tower::ServiceExt;

/// Verify that a ping with an empty object gets the exact acknowledgment
#[tokio::test]
async fn test_ping_acknowledged_exactly() {
    let response = create_open_app()
        .oneshot(webhook_request("ping", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        r#"{"status":"success","event":"ping","message":"GitHub ping event received!"}"#
    );
}

/// Verify that a push is parsed and dispatched with its commit summaries
#[tokio::test]
async fn test_push_dispatched_with_parsed_fields() {
    let (app, handler, _) = create_test_app(None);

    let response = app
        .oneshot(webhook_request("push", PUSH_PAYLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["event"], "push");
    assert_eq!(json["message"], "GitHub push event received!");

    let events = handler.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0.as_str(), "72d3162e-cc78-11e3-81ab-4c9367dc0958");
    match &events[0].1 {
        WebhookEvent::Push(push) => {
            assert_eq!(push.repository, "o/r");
            assert_eq!(push.branch, "main");
            assert_eq!(push.pusher, "alice");
            assert_eq!(
                push.commits,
                vec![CommitSummary {
                    short_id: "abcdef1".to_string(),
                    message: "fix bug".to_string(),
                }]
            );
        }
        other => panic!("expected push, got: {:?}", other),
    }
}

/// Verify that a pull request is parsed and acknowledged
#[tokio::test]
async fn test_pull_request_dispatched() {
    let (app, handler, _) = create_test_app(None);

    let response = app
        .oneshot(webhook_request("pull_request", PULL_REQUEST_PAYLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["event"], "pull_request");

    match &handler.events()[0].1 {
        WebhookEvent::PullRequest(pr) => {
            assert_eq!(pr.action, "opened");
            assert_eq!(pr.number, Some(42));
            assert_eq!(pr.title.as_deref(), Some("Add CI"));
        }
        other => panic!("expected pull_request, got: {:?}", other),
    }
}

/// Verify that unknown event kinds are echoed back verbatim
#[tokio::test]
async fn test_unknown_event_echoed() {
    let (app, handler, _) = create_test_app(None);

    let response = app
        .oneshot(webhook_request("workflow_run", r#"{"action":"completed"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ack: AckResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(ack.event, "workflow_run");
    assert!(ack.message.contains("workflow_run"));
    assert_eq!(
        handler.events()[0].1,
        WebhookEvent::Unknown {
            label: "workflow_run".to_string()
        }
    );
}

/// Verify that a push without a repository degrades to "unknown"
#[tokio::test]
async fn test_push_without_repository_uses_defaults() {
    let (app, handler, _) = create_test_app(None);

    let response = app
        .oneshot(webhook_request("push", r#"{"commits":[]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    match &handler.events()[0].1 {
        WebhookEvent::Push(push) => {
            assert_eq!(push.repository, "unknown");
            assert_eq!(push.pusher, "unknown");
            assert!(push.commits.is_empty());
        }
        other => panic!("expected push, got: {:?}", other),
    }
}

/// Verify that unparseable and empty bodies are still acknowledged
#[tokio::test]
async fn test_unparseable_bodies_acknowledged() {
    for body in ["", "{", "<xml/>"] {
        let response = create_open_app()
            .oneshot(webhook_request("push", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "body: {body:?}");
        assert_eq!(body_json(response).await["event"], "push");
    }
}

/// Verify that the same delivery twice yields identical acknowledgments
#[tokio::test]
async fn test_repeated_delivery_gives_identical_acks() {
    let (app, handler, _) = create_test_app(None);

    let first = app
        .clone()
        .oneshot(webhook_request("push", PUSH_PAYLOAD))
        .await
        .unwrap();
    let second = app
        .oneshot(webhook_request("push", PUSH_PAYLOAD))
        .await
        .unwrap();

    assert_eq!(body_string(first).await, body_string(second).await);
    assert_eq!(handler.call_count(), 2);
}

/// Verify that a non-ASCII event header is echoed back instead of blanked
#[tokio::test]
async fn test_non_ascii_event_header_echoed_in_acknowledgment() {
    let mut request = webhook_request("ping", "{}");
    request.headers_mut().insert(
        "x-github-event",
        HeaderValue::from_bytes("deploy\u{e9}".as_bytes()).unwrap(),
    );

    let response = create_open_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["event"], "deploy\u{e9}");
    assert_eq!(json["message"], "GitHub deploy\u{e9} event received!");
}
