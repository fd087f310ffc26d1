// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Response status classification.
//!
//! Pure mapping from HTTP status to a semantic failure kind: 401 means the
//! caller is not authenticated, 403 means the caller is authenticated but
//! lacks permission. Nothing else is an auth failure; headers and bodies
//! are never inspected.

use reqwest::StatusCode;
use serde::Serialize;

/// Semantic kind of an authentication/authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthFailureKind {
    /// 401: the credential is missing, invalid, or expired.
    #[serde(rename = "401")]
    Unauthenticated,
    /// 403: the credential is valid but insufficient for the resource.
    #[serde(rename = "403")]
    Unauthorized,
}

impl AuthFailureKind {
    /// The wire status string carried in failure events ("401" / "403").
    pub fn as_status_str(&self) -> &'static str {
        match self {
            AuthFailureKind::Unauthenticated => "401",
            AuthFailureKind::Unauthorized => "403",
        }
    }
}

impl std::fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailureKind::Unauthenticated => write!(f, "authentication failed (401)"),
            AuthFailureKind::Unauthorized => write!(f, "authorization failed (403)"),
        }
    }
}

/// Classify a response status. Returns `None` for anything that is not an
/// auth failure, including other error statuses.
pub fn classify(status: StatusCode) -> Option<AuthFailureKind> {
    match status {
        StatusCode::UNAUTHORIZED => Some(AuthFailureKind::Unauthenticated),
        StatusCode::FORBIDDEN => Some(AuthFailureKind::Unauthorized),
        _ => None,
    }
}
