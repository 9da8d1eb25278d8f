// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound notification delivery.
//!
//! The primary channel posts the formatted message to the Telegram Bot API.
//! A single attempt is made per request; on failure the request handler
//! invokes the fallback channel. There is no retry logic.

use crate::config::TelegramConfig;
use crate::validator::ValidatedPayload;
use async_trait::async_trait;
use tracing::{debug, error, warn};

/// Primary notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the message. Returns `true` on success. Never panics;
    /// configuration and transport failures are logged and reported as
    /// `false`.
    async fn dispatch(&self, message: &str) -> bool;
}

/// Fallback channel, invoked when the primary dispatch fails. Distinct and
/// independently failable.
#[async_trait]
pub trait FallbackChannel: Send + Sync {
    /// Queue the submission for out-of-band delivery. Returns `true` if
    /// the submission was accepted by the channel.
    async fn queue(&self, payload: &ValidatedPayload) -> bool;
}

/// Telegram Bot API client.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a new notifier for the configured bot and chat.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn dispatch(&self, message: &str) -> bool {
        let (Some(token), Some(chat_id)) = (&self.config.bot_token, &self.config.chat_id) else {
            error!("Telegram bot token or chat id not configured, cannot dispatch");
            return false;
        };

        let url = format!("{}/bot{}/sendMessage", self.config.api_base, token);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": message,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        // Explicit deadline; a hung endpoint counts as a dispatch failure.
        let response = match self
            .client
            .post(&url)
            .timeout(self.config.timeout())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Telegram dispatch failed");
                return false;
            }
        };

        if response.status().is_success() {
            debug!("notification delivered");
            true
        } else {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(%status, detail = %detail, "Telegram API returned non-success");
            false
        }
    }
}

/// Email fallback queue.
pub struct EmailFallback;

#[async_trait]
impl FallbackChannel for EmailFallback {
    async fn queue(&self, payload: &ValidatedPayload) -> bool {
        // TODO: wire this to an actual mail queue; delivery currently
        // stops at the log line.
        warn!(
            email = %payload.email,
            feature_type = payload.feature_type.label(),
            "primary dispatch failed, queuing email fallback"
        );
        true
    }
}
