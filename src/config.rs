// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the `SecurityConfig` loaded at
//! client construction time.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BLACKHOLE_API_BASE_URL` | Backend base URL | `http://localhost:8000` |
//! | `BLACKHOLE_JWT_TOKEN` | Injected bearer credential | None (falls back to the persisted slot) |
//! | `BLACKHOLE_HMAC_SECRET` | Shared request-signing secret | None (requests are sent with an empty signature) |
//! | `BLACKHOLE_DATA_DIR` | Directory holding the persisted credential slot | `.blackhole` |
//!
//! A missing credential or missing secret is a valid, degraded configuration:
//! requests still go out, enforcement is the server's job.

use std::path::PathBuf;

/// Environment variable name for the backend base URL.
pub const API_BASE_URL_ENV: &str = "BLACKHOLE_API_BASE_URL";

/// Environment variable name for the build/boot-injected bearer credential.
///
/// When set, this value takes precedence over the persisted credential slot.
pub const JWT_TOKEN_ENV: &str = "BLACKHOLE_JWT_TOKEN";

/// Environment variable name for the shared HMAC-SHA256 signing secret.
pub const HMAC_SECRET_ENV: &str = "BLACKHOLE_HMAC_SECRET";

/// Environment variable name for the local data directory.
pub const DATA_DIR_ENV: &str = "BLACKHOLE_DATA_DIR";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_DATA_DIR: &str = ".blackhole";

/// Configuration inputs for the security layer.
///
/// Loading never fails: absent values degrade per the field docs rather than
/// aborting client construction.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Backend base URL, without a trailing slash.
    pub api_base_url: String,
    /// Shared signing secret. `None` downgrades signing to an empty
    /// signature (logged as a warning per request).
    pub hmac_secret: Option<String>,
    /// Directory holding the persisted credential slot.
    pub data_dir: PathBuf,
}

impl SecurityConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_or_default(API_BASE_URL_ENV, DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            hmac_secret: env_optional(HMAC_SECRET_ENV),
            data_dir: PathBuf::from(env_or_default(DATA_DIR_ENV, DEFAULT_DATA_DIR)),
        }
    }
}

/// Read an environment variable, treating unset and whitespace-only values
/// as absent.
pub(crate) fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

pub(crate) fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
