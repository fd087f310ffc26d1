// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Security header assembly.
//!
//! [`HeaderAssembler::build_headers`] is the single entry point the
//! transport calls before every request. Each invocation performs one full
//! resolve + nonce + timestamp + sign cycle; nothing is cached or reused
//! across requests. The timestamp captured here is used both inside the
//! canonical message and as the transmitted `X-Timestamp` value, so the two
//! always match within one call.
//!
//! `X-Client-Nonce`, `X-Signature`, and `X-Timestamp` are always attached,
//! even with no secret configured (the signature is then empty). This is a
//! deliberate fail-open policy: server-side behavior on empty-signature
//! requests is deployment-specific, and this client does not second-guess
//! it by omitting the headers.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::credentials::CredentialResolver;
use crate::diag::DiagnosticsSink;
use crate::nonce::generate_nonce;
use crate::signing::sign_request;

pub const HEADER_NONCE: &str = "X-Client-Nonce";
pub const HEADER_SIGNATURE: &str = "X-Signature";
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";

/// The security header set attached to one outbound request.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    /// Present iff a credential resolved. Transmitted as
    /// `Authorization: Bearer <token>`.
    pub authorization: Option<String>,
    pub nonce: String,
    /// Lowercase hex HMAC-SHA256 digest, or empty with no secret.
    pub signature: String,
    /// Epoch milliseconds, identical to the value signed.
    pub timestamp: i64,
}

impl SecurityHeaders {
    /// Attach this header set to a reqwest request builder.
    pub fn apply_to(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header(HEADER_NONCE, self.nonce.as_str())
            .header(HEADER_SIGNATURE, self.signature.as_str())
            .header(HEADER_TIMESTAMP, self.timestamp.to_string());
        match &self.authorization {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }
}

/// Builds the security header set for outbound requests.
pub struct HeaderAssembler {
    resolver: CredentialResolver,
    secret: Option<String>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl HeaderAssembler {
    pub fn new(
        resolver: CredentialResolver,
        secret: Option<String>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            resolver,
            secret,
            sink,
        }
    }

    /// Build headers for a request whose body is already serialized.
    ///
    /// `body` must be the exact bytes the transport will send (empty string
    /// for bodyless requests); the signature covers it verbatim.
    pub fn build_headers_raw(&self, method: &str, url: &str, body: &str) -> SecurityHeaders {
        let authorization = self.resolver.resolve();
        let nonce = generate_nonce();
        let timestamp = Utc::now().timestamp_millis();
        let signature = sign_request(
            method,
            url,
            body,
            &nonce,
            timestamp,
            self.secret.as_deref().unwrap_or(""),
            self.sink.as_ref(),
        );

        SecurityHeaders {
            authorization,
            nonce,
            signature,
            timestamp,
        }
    }

    /// Build headers for an optional JSON payload.
    ///
    /// A `Value::String` payload is signed as its inner text; any other
    /// value is signed as its compact JSON serialization, which must match
    /// how the transport serializes it.
    pub fn build_headers(&self, method: &str, url: &str, body: Option<&Value>) -> SecurityHeaders {
        let body_string = match body {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(value) => value.to_string(),
        };
        self.build_headers_raw(method, url, &body_string)
    }
}
