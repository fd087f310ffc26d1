// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! HMAC-SHA256 request signing.
//!
//! The canonical message is the exact string
//! `METHOD|URL|BODY|NONCE|TIMESTAMP`: method upper-cased, URL taken
//! literally (path + query, never re-normalized), body as the exact
//! serialized payload or empty. Any deviation in field order, casing, or
//! separator invalidates every signature, so a verifier must rebuild this
//! string byte for byte.
//!
//! With no secret configured, signing degrades to an empty signature and the
//! request is still sent. Enforcement of unverifiable requests belongs to
//! the server, not to this client.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::diag::{DiagnosticsSink, Severity};

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 digest.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Build the canonical string to sign.
pub fn canonical_message(
    method: &str,
    url: &str,
    body: &str,
    nonce: &str,
    timestamp: i64,
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        method.to_uppercase(),
        url,
        body,
        nonce,
        timestamp
    )
}

/// Sign a request, returning the lowercase hex HMAC-SHA256 digest.
///
/// Never panics and never returns an error: an empty `secret` yields an
/// empty signature with a warning, and a crypto-primitive failure yields an
/// empty signature with an error diagnostic.
pub fn sign_request(
    method: &str,
    url: &str,
    body: &str,
    nonce: &str,
    timestamp: i64,
    secret: &str,
    sink: &dyn DiagnosticsSink,
) -> String {
    if secret.is_empty() {
        sink.emit(
            Severity::Warning,
            "cannot sign request: HMAC secret not configured",
        );
        return String::new();
    }

    let message = canonical_message(method, url, body, nonce, timestamp);

    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(message.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
        Err(e) => {
            sink.emit(Severity::Error, &format!("failed to sign request: {e}"));
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;

    const SECRET: &str = "s3cr3t";
    const NONCE: &str = "abc-123-xyz";
    const TIMESTAMP: i64 = 1_700_000_000_000;

    fn sign(method: &str, url: &str, body: &str, nonce: &str, ts: i64, secret: &str) -> String {
        sign_request(method, url, body, nonce, ts, secret, &MemorySink::new())
    }

    #[test]
    fn canonical_message_is_pipe_delimited_and_uppercases_method() {
        let message = canonical_message("post", "/api/scrape", r#"{"url":"https://x"}"#, NONCE, TIMESTAMP);
        assert_eq!(
            message,
            r#"POST|/api/scrape|{"url":"https://x"}|abc-123-xyz|1700000000000"#
        );
    }

    #[test]
    fn golden_signature_for_scrape_request() {
        // Regression pin: HMAC-SHA256 over
        // POST|/api/scrape|{"url":"https://x"}|abc-123-xyz|1700000000000
        // under key "s3cr3t".
        let signature = sign(
            "POST",
            "/api/scrape",
            r#"{"url":"https://x"}"#,
            NONCE,
            TIMESTAMP,
            SECRET,
        );
        assert_eq!(
            signature,
            "beb886984ed1ad79365929782edb47b2db39eba3ed4b3be48dfe571b8b678f37"
        );
    }

    #[test]
    fn signature_is_64_lowercase_hex_chars() {
        let signature = sign("GET", "/health", "", NONCE, TIMESTAMP, SECRET);
        assert_eq!(signature.len(), SIGNATURE_HEX_LEN);
        assert!(signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn signing_is_deterministic() {
        let first = sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET);
        let second = sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET);
        assert_eq!(first, second);
    }

    #[test]
    fn method_casing_does_not_change_the_signature() {
        let upper = sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET);
        let lower = sign("post", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET);
        assert_eq!(upper, lower);
    }

    #[test]
    fn mutating_any_field_changes_the_signature() {
        let baseline = sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET);

        assert_ne!(sign("GET", "/api/vet", "{}", NONCE, TIMESTAMP, SECRET), baseline);
        assert_ne!(sign("POST", "/api/vet?x=1", "{}", NONCE, TIMESTAMP, SECRET), baseline);
        assert_ne!(sign("POST", "/api/vet", "{ }", NONCE, TIMESTAMP, SECRET), baseline);
        assert_ne!(sign("POST", "/api/vet", "{}", "other-nonce-0", TIMESTAMP, SECRET), baseline);
        assert_ne!(sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP + 1, SECRET), baseline);
        assert_ne!(sign("POST", "/api/vet", "{}", NONCE, TIMESTAMP, "other"), baseline);
    }

    #[test]
    fn empty_secret_degrades_to_empty_signature_with_warning() {
        let sink = MemorySink::new();
        let signature = sign_request("POST", "/api/vet", "{}", NONCE, TIMESTAMP, "", &sink);

        assert_eq!(signature, "");
        assert!(sink.contains(Severity::Warning, "HMAC secret not configured"));
    }
}
