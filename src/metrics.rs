// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the submission path.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Counters over the lifecycle of a submission.
#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    pub submissions_total: IntCounter,
    pub validation_failures_total: IntCounter,
    pub rate_limited_total: IntCounter,
    pub dispatched_total: IntCounter,
    pub dispatch_failures_total: IntCounter,
    pub fallback_invocations_total: IntCounter,
}

impl RelayMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let submissions_total = IntCounter::new(
            "relay_submissions_total",
            "Feature request submissions received",
        )?;
        let validation_failures_total = IntCounter::new(
            "relay_validation_failures_total",
            "Submissions rejected by validation",
        )?;
        let rate_limited_total = IntCounter::new(
            "relay_rate_limited_total",
            "Submissions rejected by the rate limiter",
        )?;
        let dispatched_total = IntCounter::new(
            "relay_dispatched_total",
            "Notifications delivered by the primary channel",
        )?;
        let dispatch_failures_total = IntCounter::new(
            "relay_dispatch_failures_total",
            "Primary channel delivery failures",
        )?;
        let fallback_invocations_total = IntCounter::new(
            "relay_fallback_invocations_total",
            "Fallback channel invocations",
        )?;

        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(validation_failures_total.clone()))?;
        registry.register(Box::new(rate_limited_total.clone()))?;
        registry.register(Box::new(dispatched_total.clone()))?;
        registry.register(Box::new(dispatch_failures_total.clone()))?;
        registry.register(Box::new(fallback_invocations_total.clone()))?;

        Ok(Self {
            registry,
            submissions_total,
            validation_failures_total,
            rate_limited_total,
            dispatched_total,
            dispatch_failures_total,
            fallback_invocations_total,
        })
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
