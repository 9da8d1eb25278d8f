// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Feature Request Relay Service
//!
//! Accepts feature request form submissions, validates and rate-limits
//! them, and relays a formatted notification to a Telegram channel with an
//! email fallback on delivery failure.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Max submissions per identity per window (default: 5)
//! - `RATE_LIMIT_WINDOW_MS`: Window length in milliseconds (default: 3600000)
//! - `TELEGRAM_BOT_TOKEN`: Bot token (secret, required for delivery)
//! - `TELEGRAM_CHAT_ID`: Destination chat id (secret, required for delivery)
//! - `DISPATCH_TIMEOUT_SECS`: Outbound call deadline (default: 10)
//! - `ALLOWED_ORIGIN`: Fixed CORS origin; unset means wildcard

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feature_request_relay::{
    config::Config,
    handlers::{router, AppState},
    limiter::{MemoryRateLimitStore, RateLimitStore},
    metrics::RelayMetrics,
    notifier::{EmailFallback, TelegramNotifier},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        limit = config.rate_limit.limit,
        window_ms = config.rate_limit.window_ms,
        telegram_configured = config.telegram.bot_token.is_some() && config.telegram.chat_id.is_some(),
        "Starting feature request relay"
    );

    // Create application state
    let store = Arc::new(MemoryRateLimitStore::new(
        config.rate_limit.limit,
        config.rate_limit.window_duration(),
    ));
    let state = Arc::new(AppState {
        store: store.clone(),
        notifier: Arc::new(TelegramNotifier::new(config.telegram.clone())),
        fallback: Arc::new(EmailFallback),
        metrics: RelayMetrics::new()?,
        config: config.clone(),
    });

    // Spawn the sweep task
    let sweep_store = store.clone();
    let sweep_interval = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sweep_store.sweep().await;
        }
    });

    // Build router and start server
    let app = router(state);
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        rate_limit: feature_request_relay::config::RateLimitConfig {
            limit: std::env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            window_ms: std::env::var("RATE_LIMIT_WINDOW_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600_000),
            ..Default::default()
        },
        telegram: feature_request_relay::config::TelegramConfig {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            chat_id: std::env::var("TELEGRAM_CHAT_ID").ok(),
            timeout_secs: std::env::var("DISPATCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            ..Default::default()
        },
        cors: feature_request_relay::config::CorsConfig {
            allowed_origin: std::env::var("ALLOWED_ORIGIN").ok(),
        },
        ..Default::default()
    }
}
