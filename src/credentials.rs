// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Credential resolution.
//!
//! The resolver polls an explicit, ordered list of providers and returns the
//! first credential that resolves. The production chain is environment
//! override first, persisted slot second; tests substitute in-memory
//! providers. Resolution never fails: a provider error degrades to "absent"
//! and is reported through the diagnostics sink.

use std::sync::Arc;

use crate::config::{env_optional, JWT_TOKEN_ENV};
use crate::diag::{DiagnosticsSink, Severity};
use crate::store::{StoreError, TokenStore};

/// One source of a bearer credential.
pub trait CredentialProvider: Send + Sync {
    /// Short name used in diagnostics when this provider fails.
    fn name(&self) -> &str;

    fn resolve(&self) -> Result<Option<String>, StoreError>;
}

/// Reads the credential from an environment variable.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new(JWT_TOKEN_ENV)
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn name(&self) -> &str {
        &self.var
    }

    fn resolve(&self) -> Result<Option<String>, StoreError> {
        Ok(env_optional(&self.var))
    }
}

/// Reads the credential from the persisted slot.
pub struct StoredCredentialProvider {
    store: Arc<dyn TokenStore>,
}

impl StoredCredentialProvider {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl CredentialProvider for StoredCredentialProvider {
    fn name(&self) -> &str {
        "persisted credential slot"
    }

    fn resolve(&self) -> Result<Option<String>, StoreError> {
        self.store.load()
    }
}

/// Fixed credential, mainly for tests.
pub struct StaticCredentialProvider {
    token: Option<String>,
}

impl StaticCredentialProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn name(&self) -> &str {
        "static credential"
    }

    fn resolve(&self) -> Result<Option<String>, StoreError> {
        Ok(self.token.clone())
    }
}

/// Polls providers in order and returns the first credential found.
pub struct CredentialResolver {
    providers: Vec<Box<dyn CredentialProvider>>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl CredentialResolver {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { providers, sink }
    }

    /// Production chain: environment override, then the persisted slot.
    pub fn standard(store: Arc<dyn TokenStore>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self::new(
            vec![
                Box::new(EnvCredentialProvider::default()),
                Box::new(StoredCredentialProvider::new(store)),
            ],
            sink,
        )
    }

    /// Resolve the current bearer credential, if any.
    ///
    /// No side effects. A provider failure is logged and treated as absent,
    /// never surfaced to the caller.
    pub fn resolve(&self) -> Option<String> {
        for provider in &self.providers {
            match provider.resolve() {
                Ok(Some(token)) => return Some(token),
                Ok(None) => continue,
                Err(e) => {
                    self.sink.emit(
                        Severity::Warning,
                        &format!("failed to read credential from {}: {e}", provider.name()),
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;
    use crate::store::MemoryTokenStore;

    struct FailingProvider;

    impl CredentialProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing provider"
        }

        fn resolve(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("storage offline")))
        }
    }

    #[test]
    fn earlier_providers_take_precedence() {
        let sink = Arc::new(MemorySink::new());
        let resolver = CredentialResolver::new(
            vec![
                Box::new(StaticCredentialProvider::new(Some("first".to_string()))),
                Box::new(StaticCredentialProvider::new(Some("second".to_string()))),
            ],
            sink,
        );

        assert_eq!(resolver.resolve(), Some("first".to_string()));
    }

    #[test]
    fn absent_provider_falls_through_to_next() {
        let sink = Arc::new(MemorySink::new());
        let resolver = CredentialResolver::new(
            vec![
                Box::new(StaticCredentialProvider::new(None)),
                Box::new(StaticCredentialProvider::new(Some("fallback".to_string()))),
            ],
            sink,
        );

        assert_eq!(resolver.resolve(), Some("fallback".to_string()));
    }

    #[test]
    fn provider_failure_degrades_to_absent_and_is_logged() {
        let sink = Arc::new(MemorySink::new());
        let resolver = CredentialResolver::new(vec![Box::new(FailingProvider)], sink.clone());

        assert_eq!(resolver.resolve(), None);
        assert!(sink.contains(Severity::Warning, "failing provider"));
    }

    #[test]
    fn provider_failure_still_reaches_later_providers() {
        let sink = Arc::new(MemorySink::new());
        let resolver = CredentialResolver::new(
            vec![
                Box::new(FailingProvider),
                Box::new(StaticCredentialProvider::new(Some("survivor".to_string()))),
            ],
            sink,
        );

        assert_eq!(resolver.resolve(), Some("survivor".to_string()));
    }

    #[test]
    fn stored_provider_reads_the_slot() {
        let sink = Arc::new(MemorySink::new());
        let store = Arc::new(MemoryTokenStore::with_token("persisted"));
        let resolver = CredentialResolver::new(
            vec![Box::new(StoredCredentialProvider::new(store.clone()))],
            sink,
        );

        assert_eq!(resolver.resolve(), Some("persisted".to_string()));

        store.clear().unwrap();
        assert_eq!(resolver.resolve(), None);
    }
}
