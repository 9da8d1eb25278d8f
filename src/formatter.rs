// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification message rendering.
//!
//! Deterministic template over a sanitized payload. The formatter adds the
//! markup markers itself and assumes its input is already safe for the
//! destination renderer; no further escaping happens here.

use crate::validator::ValidatedPayload;

/// Render a submission into the notification text sent to the chat channel.
pub fn format_notification(payload: &ValidatedPayload) -> String {
    let name = if payload.name.is_empty() {
        "Anonymous"
    } else {
        &payload.name
    };

    let mut text = format!(
        "🚀 <b>New Feature Request</b>\n\n\
         <b>From:</b> {} ({})\n\
         <b>Type:</b> {}\n\
         <b>Priority:</b> {}\n\n\
         <b>Description:</b>\n{}",
        name,
        payload.email,
        payload.feature_type.label(),
        payload.priority.label(),
        payload.description,
    );

    if !payload.use_case.is_empty() {
        text.push_str("\n\n<b>Use Case:</b>\n");
        text.push_str(&payload.use_case);
    }

    text
}
