// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the feature request relay.
//!
//! The submission endpoint walks a fixed sequence: method check, parse,
//! validate, rate check, sanitize, format, dispatch. Every response carries
//! CORS headers, including rejections and the preflight reply.

use crate::config::Config;
use crate::formatter::format_notification;
use crate::limiter::{RateLimitDecision, RateLimitStore};
use crate::metrics::RelayMetrics;
use crate::notifier::{FallbackChannel, Notifier};
use crate::validator::{validate, SubmissionPayload};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared application state. The store, notifier and fallback are injected
/// as trait objects so tests can substitute recording implementations.
pub struct AppState {
    pub store: Arc<dyn RateLimitStore>,
    pub notifier: Arc<dyn Notifier>,
    pub fallback: Arc<dyn FallbackChannel>,
    pub metrics: RelayMetrics,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/feature-request", any(feature_request));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "feature-request-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Feature request submission endpoint.
///
/// Only POST is processed; OPTIONS answers the CORS preflight with an empty
/// 204 and any other method gets a 405.
pub async fn feature_request(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let response = if method == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else if method == Method::POST {
        process_submission(&state, &headers, &body).await
    } else {
        json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    };
    apply_cors(response, &state.config)
}

/// Run a POST body through validation, rate limiting and dispatch.
async fn process_submission(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Response {
    state.metrics.submissions_total.inc();

    // Malformed bodies fall into the catch-all response rather than being
    // reported as a distinct client error.
    let payload: SubmissionPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unreadable request body");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    // Validation precedes rate limiting: a rejected submission must not
    // consume the caller's budget.
    let validated = match validate(&payload) {
        Ok(validated) => validated,
        Err(e) => {
            info!(error = %e, "validation failed");
            state.metrics.validation_failures_total.inc();
            return json_error(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    let identity = format!("{}:{}", client_ip(headers), validated.email);
    match state.store.allow(&identity).await {
        RateLimitDecision::Allowed { remaining } => {
            debug!(identity = %identity, remaining, "rate check passed");
        }
        RateLimitDecision::Limited { retry_after } => {
            info!(
                identity = %identity,
                retry_after_secs = retry_after.as_secs(),
                "submission rate limited"
            );
            state.metrics.rate_limited_total.inc();
            let mut response = json_error(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after.as_secs()));
            return response;
        }
    }

    let sanitized = validated.sanitized();
    let message = format_notification(&sanitized);

    if state.notifier.dispatch(&message).await {
        state.metrics.dispatched_total.inc();
    } else {
        state.metrics.dispatch_failures_total.inc();
        state.metrics.fallback_invocations_total.inc();
        if !state.fallback.queue(&sanitized).await {
            error!(email = %sanitized.email, "fallback channel failed, notification lost");
        }
    }

    // Optimistic success: the contract is "request accepted", not
    // "notification delivered", so dispatch failure does not change the
    // outcome.
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "Feature request submitted successfully",
        })),
    )
        .into_response()
}

/// Derive the caller's network identity from proxy headers.
///
/// The relay always sits behind the host's edge, so the socket peer is the
/// proxy; `x-forwarded-for` (first hop) and `x-real-ip` are the usable
/// signals.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|value| value.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Attach CORS headers to a response. Wildcard origin unless a fixed one is
/// configured for production.
fn apply_cors(mut response: Response, config: &Config) -> Response {
    let origin = config.cors.allowed_origin.as_deref().unwrap_or("*");
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}
