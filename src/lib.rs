// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Feature Request Relay
//!
//! This crate accepts feature request form submissions over HTTP,
//! validates and throttles them, and relays an outbound chat notification:
//!
//! - Required-field and email-shape validation with typed errors
//! - Entity escaping of free-text fields before downstream rendering
//! - Fixed-window rate limiting keyed by caller IP + email (5 per hour
//!   default) behind an injectable store
//! - Single-attempt Telegram dispatch with an explicit deadline and a
//!   fallback channel on failure
//! - Optimistic success: dispatch failure never fails the caller's request

pub mod config;
pub mod formatter;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod notifier;
pub mod validator;

pub use config::Config;
pub use handlers::{router, AppState};
pub use limiter::{MemoryRateLimitStore, RateLimitDecision, RateLimitStore};
pub use metrics::RelayMetrics;
pub use notifier::{EmailFallback, FallbackChannel, Notifier, TelegramNotifier};
pub use validator::{SubmissionPayload, ValidatedPayload, ValidationError};
