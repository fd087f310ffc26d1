// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Authenticated client for the Blackhole backend.
//!
//! Thin transport wrapper around reqwest: every outbound call gets a fresh
//! security header set from the assembler, and every completed response is
//! run through the classifier. A classified 401/403 is propagated to the
//! event bus before the error is returned to the caller, so the UI reacts
//! even when the call site ignores the result. Payload shapes are opaque
//! JSON; this layer owns authentication, not the business API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::classify::classify;
use crate::config::SecurityConfig;
use crate::credentials::CredentialResolver;
use crate::diag::{DiagnosticsSink, TracingSink};
use crate::error::ApiError;
use crate::events::AuthEventBus;
use crate::headers::HeaderAssembler;
use crate::propagate::FailurePropagator;
use crate::store::{FileTokenStore, TokenStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolve a tool name to its backend endpoint.
pub fn tool_endpoint(tool: &str) -> Option<&'static str> {
    match tool {
        "scraping" => Some("/api/scrape"),
        "vetting" => Some("/api/vet"),
        "summarization" => Some("/api/summarize"),
        "prompt" => Some("/api/prompt"),
        "video" => Some("/api/video-search"),
        "validate-video" => Some("/api/validate-video"),
        _ => None,
    }
}

/// Authenticated API client.
pub struct ApiClient {
    base_url: String,
    http: Client,
    assembler: HeaderAssembler,
    propagator: FailurePropagator,
    bus: AuthEventBus,
}

impl ApiClient {
    /// Build a client over an explicit store, bus, and diagnostics sink.
    pub fn new(
        config: SecurityConfig,
        store: Arc<dyn TokenStore>,
        bus: AuthEventBus,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        let resolver = CredentialResolver::standard(store.clone(), sink.clone());
        let assembler = HeaderAssembler::new(resolver, config.hmac_secret.clone(), sink.clone());
        let propagator = FailurePropagator::new(store, bus.clone(), sink);

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            assembler,
            propagator,
            bus,
        })
    }

    /// Build a client from the environment with file-backed credential
    /// storage and tracing diagnostics.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = SecurityConfig::from_env();
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.data_dir));
        Self::new(config, store, AuthEventBus::new(), Arc::new(TracingSink))
    }

    /// The bus UI components subscribe to for failure and toast events.
    pub fn event_bus(&self) -> &AuthEventBus {
        &self.bus
    }

    /// Check backend health. `Ok(true)` iff the backend responds 2xx with
    /// `{"status": "healthy"}`.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let body = match self.get_json("/health").await {
            Ok(body) => body,
            Err(ApiError::AuthRejected(kind)) => return Err(ApiError::AuthRejected(kind)),
            Err(_) => return Ok(false),
        };
        Ok(body.get("status").and_then(Value::as_str) == Some("healthy"))
    }

    /// Run the unified news workflow for an article URL.
    pub async fn run_workflow(&self, article_url: &str) -> Result<Value, ApiError> {
        self.post_json("/api/unified-news-workflow", &json!({ "url": article_url }))
            .await
    }

    /// Invoke an individual backend tool by name.
    pub async fn run_tool(&self, tool: &str, payload: &Value) -> Result<Value, ApiError> {
        let endpoint =
            tool_endpoint(tool).ok_or_else(|| ApiError::UnknownTool(tool.to_string()))?;
        self.post_json(endpoint, payload).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let headers = self.assembler.build_headers_raw("GET", path, "");
        let request = self.http.get(format!("{}{path}", self.base_url));
        let response = headers
            .apply_to(request)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("GET {path} failed: {e}")))?;

        let status = response.status();
        self.check_auth(status)?;
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Request(format!("GET {path} returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("GET {path} invalid JSON: {e}")))
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value, ApiError> {
        // Serialize once; the signature must cover the exact bytes sent.
        let body = serde_json::to_string(payload)?;
        let headers = self.assembler.build_headers_raw("POST", path, &body);

        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header("Content-Type", "application/json")
            .body(body);
        let response = headers
            .apply_to(request)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("POST {path} failed: {e}")))?;

        let status = response.status();
        self.check_auth(status)?;
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Request(format!("POST {path} returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("POST {path} invalid JSON: {e}")))
    }

    /// Classify the status; on 401/403 propagate to the bus and fail the call.
    fn check_auth(&self, status: reqwest::StatusCode) -> Result<(), ApiError> {
        if let Some(kind) = classify(status) {
            self.propagator.on_failure(kind);
            return Err(ApiError::AuthRejected(kind));
        }
        Ok(())
    }
}
