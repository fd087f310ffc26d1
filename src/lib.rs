// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Blackhole Client - Authenticated API Client
//!
//! This crate implements the client-side request-authentication layer of the
//! Blackhole news-analysis frontend: every outbound API call carries a bearer
//! credential (when one resolves), a single-use nonce, and an HMAC-SHA256
//! signature over a canonical representation of the request. Authentication
//! and authorization failures observed on responses are propagated to UI
//! subscribers through a typed event bus, without coupling the networking
//! layer to any rendering code.
//!
//! ## Request Flow
//!
//! 1. `credentials` resolves the current bearer token (env override, then
//!    the persisted slot in `store`)
//! 2. `nonce` generates a fresh anti-replay token
//! 3. `signing` computes HMAC-SHA256 over `METHOD|URL|BODY|NONCE|TIMESTAMP`
//! 4. `headers` assembles the security header set for the transport
//! 5. `classify` maps the response status (401 vs 403)
//! 6. `propagate` invalidates stale credentials and broadcasts failure and
//!    toast events on the `events` bus
//!
//! ## Modules
//!
//! - `client` - Authenticated reqwest client for the Blackhole backend
//! - `config` - Environment-driven configuration
//! - `credentials` - Ordered credential provider chain
//! - `diag` - Injected diagnostics sink (structured log events)
//! - `events` - Broadcast bus for auth-failure and toast events
//! - `store` - Persisted single-slot credential storage

pub mod classify;
pub mod client;
pub mod config;
pub mod credentials;
pub mod diag;
pub mod error;
pub mod events;
pub mod headers;
pub mod nonce;
pub mod propagate;
pub mod signing;
pub mod store;

pub use classify::{classify, AuthFailureKind};
pub use client::ApiClient;
pub use config::SecurityConfig;
pub use credentials::{CredentialProvider, CredentialResolver};
pub use diag::{DiagnosticsSink, Severity, TracingSink};
pub use error::ApiError;
pub use events::{AuthEventBus, AuthFailureEvent, ToastNotification, ToastSeverity};
pub use headers::{HeaderAssembler, SecurityHeaders};
pub use propagate::FailurePropagator;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
