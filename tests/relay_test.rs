// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests over the HTTP surface: status codes, CORS headers and
//! dispatch/fallback accounting.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::Response,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use feature_request_relay::{
    config::{Config, RateLimitConfig},
    handlers::{router, AppState},
    limiter::MemoryRateLimitStore,
    metrics::RelayMetrics,
    notifier::{FallbackChannel, Notifier},
    validator::ValidatedPayload,
};

struct RecordingNotifier {
    calls: AtomicUsize,
    succeed: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, _message: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.succeed
    }
}

struct RecordingFallback {
    calls: AtomicUsize,
}

#[async_trait]
impl FallbackChannel for RecordingFallback {
    async fn queue(&self, _payload: &ValidatedPayload) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        true
    }
}

struct Harness {
    app: Router,
    store: Arc<MemoryRateLimitStore>,
    notifier: Arc<RecordingNotifier>,
    fallback: Arc<RecordingFallback>,
}

fn harness(limit: u32, dispatch_succeeds: bool) -> Harness {
    let config = Config {
        rate_limit: RateLimitConfig {
            limit,
            ..Default::default()
        },
        ..Default::default()
    };
    let store = Arc::new(MemoryRateLimitStore::new(
        limit,
        config.rate_limit.window_duration(),
    ));
    let notifier = Arc::new(RecordingNotifier {
        calls: AtomicUsize::new(0),
        succeed: dispatch_succeeds,
    });
    let fallback = Arc::new(RecordingFallback {
        calls: AtomicUsize::new(0),
    });
    let state = Arc::new(AppState {
        store: store.clone(),
        notifier: notifier.clone(),
        fallback: fallback.clone(),
        metrics: RelayMetrics::new().unwrap(),
        config,
    });
    Harness {
        app: router(state),
        store,
        notifier,
        fallback,
    }
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/feature-request")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_valid_submission_accepted_with_one_dispatch() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            r#"{"email":"a@b.com","description":"Please add dark mode support"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
    assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.fallback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_sixth_submission_rate_limited_without_dispatch() {
    let h = harness(5, true);
    let body = r#"{"email":"a@b.com","description":"Please add dark mode support"}"#;

    for i in 0..5 {
        let response = h.app.clone().oneshot(post_json(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "submission {}", i + 1);
    }

    let response = h.app.clone().oneshot(post_json(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let json = body_json(response).await;
    assert_eq!(json["error"], "Too many requests");

    assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_invalid_email_rejected_before_rate_check() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            r#"{"email":"not-an-email","description":"Please add dark mode support"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email address");

    assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 0);
    // Validation ran first: no rate limit record was created.
    assert_eq!(h.store.active_records().await, 0);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(post_json(r#"{"email":"a@b.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing required fields");
}

#[tokio::test]
async fn test_short_description_rejected() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(post_json(r#"{"email":"a@b.com","description":"too short"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Description must be at least 10 characters");
}

#[tokio::test]
async fn test_preflight_gets_empty_204_with_cors() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/feature-request")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS),
        Some(&HeaderValue::from_static("POST, OPTIONS"))
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_other_methods_get_405() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/feature-request")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    let json = body_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn test_malformed_body_hits_catch_all() {
    let h = harness(5, true);

    let response = h.app.clone().oneshot(post_json("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dispatch_failure_still_succeeds_and_invokes_fallback() {
    let h = harness(5, false);

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            r#"{"email":"a@b.com","description":"Please add dark mode support"}"#,
        ))
        .await
        .unwrap();

    // Optimistic success: the caller is not exposed to delivery failures.
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    assert_eq!(h.notifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.fallback.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_configured_origin_echoed_on_responses() {
    let config = Config {
        cors: feature_request_relay::config::CorsConfig {
            allowed_origin: Some("https://example.com".to_string()),
        },
        ..Default::default()
    };
    let store = Arc::new(MemoryRateLimitStore::new(
        5,
        config.rate_limit.window_duration(),
    ));
    let state = Arc::new(AppState {
        store,
        notifier: Arc::new(RecordingNotifier {
            calls: AtomicUsize::new(0),
            succeed: true,
        }),
        fallback: Arc::new(RecordingFallback {
            calls: AtomicUsize::new(0),
        }),
        metrics: RelayMetrics::new().unwrap(),
        config,
    });
    let app = router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/feature-request")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("https://example.com"))
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness(5, true);

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "feature-request-relay");
}

#[tokio::test]
async fn test_metrics_endpoint_tracks_submissions() {
    let h = harness(5, true);

    h.app
        .clone()
        .oneshot(post_json(
            r#"{"email":"a@b.com","description":"Please add dark mode support"}"#,
        ))
        .await
        .unwrap();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("relay_submissions_total 1"));
    assert!(text.contains("relay_dispatched_total 1"));
}
