// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission validation and sanitization.
//!
//! Validation checks the required fields and their shape; sanitization
//! neutralizes markup-unsafe characters in the free-text fields before the
//! payload reaches any downstream renderer. Both are pure functions over
//! their input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error types. The `Display` text is the caller-visible
/// error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Description must be at least 10 characters")]
    DescriptionTooShort,

    #[error("Description must be at most 2000 characters")]
    DescriptionTooLong,
}

/// Category of the requested feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    Enhancement,
    NewFeature,
    BugFix,
    Integration,
    #[default]
    Other,
}

impl FeatureType {
    /// Display label: upper-cased, separators replaced by spaces.
    pub fn label(self) -> &'static str {
        match self {
            Self::Enhancement => "ENHANCEMENT",
            Self::NewFeature => "NEW FEATURE",
            Self::BugFix => "BUG FIX",
            Self::Integration => "INTEGRATION",
            Self::Other => "OTHER",
        }
    }
}

/// Requested priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Raw form submission as received on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub feature_type: FeatureType,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
}

/// A submission that passed validation. Optional fields default to the
/// empty string; `sanitized` has not yet been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPayload {
    pub name: String,
    pub email: String,
    pub feature_type: FeatureType,
    pub priority: Priority,
    pub description: String,
    pub use_case: String,
}

impl ValidatedPayload {
    /// Apply entity escaping to every free-text field.
    pub fn sanitized(self) -> Self {
        Self {
            name: sanitize(&self.name),
            email: sanitize(&self.email),
            feature_type: self.feature_type,
            priority: self.priority,
            description: sanitize(&self.description),
            use_case: sanitize(&self.use_case),
        }
    }
}

/// Validate a raw submission.
///
/// `email` and `description` are required; the description length bounds
/// apply after trimming. Optional fields pass through unchanged.
pub fn validate(payload: &SubmissionPayload) -> Result<ValidatedPayload, ValidationError> {
    let email = payload.email.as_deref().map(str::trim).unwrap_or("");
    let description = payload.description.as_deref().map(str::trim).unwrap_or("");

    if email.is_empty() || description.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let length = description.chars().count();
    if length < 10 {
        return Err(ValidationError::DescriptionTooShort);
    }
    if length > 2000 {
        return Err(ValidationError::DescriptionTooLong);
    }

    Ok(ValidatedPayload {
        name: payload.name.clone().unwrap_or_default(),
        email: email.to_string(),
        feature_type: payload.feature_type,
        priority: payload.priority,
        description: description.to_string(),
        use_case: payload.use_case.clone().unwrap_or_default(),
    })
}

/// Basic address-shape check, equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
fn is_valid_email(email: &str) -> bool {
    fn segment_ok(s: &str) -> bool {
        !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@')
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    segment_ok(local) && segment_ok(host) && segment_ok(tld)
}

/// Replace markup-unsafe characters with their HTML entities.
///
/// Ampersands pass through untouched, so already-escaped text is not
/// double-escaped on a second pass.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}
