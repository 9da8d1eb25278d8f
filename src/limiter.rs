// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiting keyed by caller identity.
//!
//! The store is an explicit abstraction so the single-process in-memory
//! implementation and a distributed-cache-backed one are interchangeable.
//! Callers inject the store rather than reaching for ambient state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Outcome of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitDecision {
    /// Request is allowed
    Allowed {
        /// Remaining requests in the current window
        remaining: u32,
    },
    /// Request is rate limited
    Limited {
        /// Time until the identity's window resets
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Per-identity request counter within a window.
#[derive(Debug)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: Instant,
}

/// Store abstraction over the rate limit state.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Check and record a request for the given identity key.
    async fn allow(&self, identity_key: &str) -> RateLimitDecision;

    /// Remove expired records. Housekeeping only: expired records are also
    /// treated as fresh on next access, so correctness never depends on
    /// sweep cadence.
    async fn sweep(&self);
}

/// In-memory fixed-window store.
///
/// The check-and-increment sequence runs under a single write lock, so a
/// caller cannot exceed the limit through interleaved requests on a
/// multi-threaded runtime.
pub struct MemoryRateLimitStore {
    limit: u32,
    window: Duration,
    records: RwLock<HashMap<String, RateLimitRecord>>,
}

impl MemoryRateLimitStore {
    /// Create a store with the given per-window limit and window length.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of identities currently tracked (including expired records
    /// not yet swept).
    pub async fn active_records(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn allow(&self, identity_key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut records = self.records.write().await;

        match records.get_mut(identity_key) {
            Some(record) if now < record.window_reset_at => {
                if record.count < self.limit {
                    record.count += 1;
                    debug!(key = %identity_key, count = record.count, "request allowed");
                    RateLimitDecision::Allowed {
                        remaining: self.limit - record.count,
                    }
                } else {
                    let retry_after = record.window_reset_at.duration_since(now);
                    debug!(key = %identity_key, ?retry_after, "rate limit exceeded");
                    RateLimitDecision::Limited { retry_after }
                }
            }
            // No record, or the window has elapsed: start a fresh window.
            _ => {
                records.insert(
                    identity_key.to_string(),
                    RateLimitRecord {
                        count: 1,
                        window_reset_at: now + self.window,
                    },
                );
                RateLimitDecision::Allowed {
                    remaining: self.limit.saturating_sub(1),
                }
            }
        }
    }

    async fn sweep(&self) {
        let now = Instant::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now < record.window_reset_at);
        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, active = records.len(), "swept expired rate limit records");
        }
    }
}
