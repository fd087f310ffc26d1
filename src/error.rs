// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! API client error type.

use crate::classify::AuthFailureKind;

/// Errors surfaced by [`crate::client::ApiClient`] operations.
///
/// Local configuration absence (no secret, no credential) is deliberately
/// not represented here: those degrade inside the header assembler and the
/// request still goes out.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("request serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(String),

    #[error("response was invalid: {0}")]
    InvalidResponse(String),

    /// The server classified the request as an auth failure. By the time
    /// this error is returned the failure has already been propagated to
    /// event-bus subscribers.
    #[error("request rejected: {0}")]
    AuthRejected(AuthFailureKind),
}
