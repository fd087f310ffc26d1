// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Auth-failure propagation.
//!
//! On a 401 the persisted credential is cleared synchronously before any
//! event is published, so the next resolver call already sees it absent.
//! On a 403 the credential is left untouched: it is valid, the permission
//! is not. Every classified failure produces exactly one failure event and
//! one toast; there is no de-duplication across requests.

use std::sync::Arc;

use crate::classify::AuthFailureKind;
use crate::diag::{DiagnosticsSink, Severity};
use crate::events::{AuthEventBus, AuthFailureEvent, ToastNotification, ToastSeverity};
use crate::store::TokenStore;

/// Modal message for an expired/invalid session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
/// Modal message for a permission failure.
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to access this resource.";

const SESSION_EXPIRED_TOAST: &str = "Authentication failed: Please log in again";
const PERMISSION_DENIED_TOAST: &str = "Access denied: Insufficient permissions";

/// Invalidates stale credentials and notifies event-bus subscribers.
pub struct FailurePropagator {
    store: Arc<dyn TokenStore>,
    bus: AuthEventBus,
    sink: Arc<dyn DiagnosticsSink>,
}

impl FailurePropagator {
    pub fn new(store: Arc<dyn TokenStore>, bus: AuthEventBus, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { store, bus, sink }
    }

    /// Handle one classified failure.
    ///
    /// Fire-and-forget: there is no return value and no error when nothing
    /// is subscribed. Calling this twice for two failed requests delivers
    /// two independent event pairs.
    pub fn on_failure(&self, kind: AuthFailureKind) {
        match kind {
            AuthFailureKind::Unauthenticated => {
                self.sink.emit(
                    Severity::Error,
                    "authentication failed: invalid or expired token",
                );
                if let Err(e) = self.store.clear() {
                    // The slot could not be cleared; the event still goes
                    // out so the user is told to re-authenticate.
                    self.sink
                        .emit(Severity::Warning, &format!("failed to clear credential slot: {e}"));
                }
                self.bus.publish_failure(AuthFailureEvent {
                    kind,
                    message: SESSION_EXPIRED_MESSAGE.to_string(),
                });
                self.bus.publish_toast(ToastNotification {
                    message: SESSION_EXPIRED_TOAST.to_string(),
                    severity: ToastSeverity::Error,
                });
            }
            AuthFailureKind::Unauthorized => {
                self.sink
                    .emit(Severity::Error, "authorization failed: insufficient permissions");
                self.bus.publish_failure(AuthFailureEvent {
                    kind,
                    message: PERMISSION_DENIED_MESSAGE.to_string(),
                });
                self.bus.publish_toast(ToastNotification {
                    message: PERMISSION_DENIED_TOAST.to_string(),
                    severity: ToastSeverity::Warning,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::MemorySink;
    use crate::store::MemoryTokenStore;
    use tokio::sync::broadcast::error::TryRecvError;

    fn propagator() -> (
        FailurePropagator,
        Arc<MemoryTokenStore>,
        AuthEventBus,
        Arc<MemorySink>,
    ) {
        let store = Arc::new(MemoryTokenStore::with_token("live-token"));
        let bus = AuthEventBus::new();
        let sink = Arc::new(MemorySink::new());
        let propagator = FailurePropagator::new(store.clone(), bus.clone(), sink.clone());
        (propagator, store, bus, sink)
    }

    #[test]
    fn unauthenticated_clears_the_slot_and_notifies_once() {
        let (propagator, store, bus, _) = propagator();
        let mut failures = bus.subscribe_failures();
        let mut toasts = bus.subscribe_toasts();

        propagator.on_failure(AuthFailureKind::Unauthenticated);

        assert_eq!(store.load().unwrap(), None);

        let event = failures.try_recv().unwrap();
        assert_eq!(event.kind, AuthFailureKind::Unauthenticated);
        assert_eq!(event.message, SESSION_EXPIRED_MESSAGE);
        assert_eq!(failures.try_recv(), Err(TryRecvError::Empty));

        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.severity, ToastSeverity::Error);
        assert_eq!(toasts.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn unauthorized_leaves_the_credential_untouched() {
        let (propagator, store, bus, _) = propagator();
        let mut failures = bus.subscribe_failures();
        let mut toasts = bus.subscribe_toasts();

        propagator.on_failure(AuthFailureKind::Unauthorized);

        assert_eq!(store.load().unwrap(), Some("live-token".to_string()));

        let event = failures.try_recv().unwrap();
        assert_eq!(event.kind, AuthFailureKind::Unauthorized);
        assert_eq!(event.message, PERMISSION_DENIED_MESSAGE);
        assert_eq!(failures.try_recv(), Err(TryRecvError::Empty));

        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.severity, ToastSeverity::Warning);
    }

    #[test]
    fn each_failure_delivers_its_own_event_pair() {
        let (propagator, _, bus, _) = propagator();
        let mut failures = bus.subscribe_failures();

        propagator.on_failure(AuthFailureKind::Unauthenticated);
        propagator.on_failure(AuthFailureKind::Unauthenticated);

        assert!(failures.try_recv().is_ok());
        assert!(failures.try_recv().is_ok());
        assert_eq!(failures.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn resolver_sees_absent_credential_after_a_401() {
        let (propagator, store, _, sink) = propagator();
        let resolver = crate::credentials::CredentialResolver::standard(store, sink);
        std::env::remove_var(crate::config::JWT_TOKEN_ENV);

        assert_eq!(resolver.resolve(), Some("live-token".to_string()));
        propagator.on_failure(AuthFailureKind::Unauthenticated);
        assert_eq!(resolver.resolve(), None);
    }

    #[test]
    fn propagation_without_subscribers_is_silent() {
        let (propagator, store, _, _) = propagator();
        propagator.on_failure(AuthFailureKind::Unauthenticated);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn failures_are_logged_to_the_diagnostics_sink() {
        let (propagator, _, _, sink) = propagator();
        propagator.on_failure(AuthFailureKind::Unauthorized);
        assert!(sink.contains(Severity::Error, "insufficient permissions"));
    }
}
