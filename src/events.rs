// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Typed event bus for auth-failure and toast notifications.
//!
//! The networking layer holds a publisher; UI components hold
//! subscriptions. There is no implicit global instance: callers construct
//! one bus and pass clones of it around. Publishing is fire-and-forget
//! broadcast to the subscribers registered at emission time; subscribers
//! registered afterwards miss the event (no buffering or replay), and
//! publishing with zero subscribers is not an error.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::classify::AuthFailureKind;

/// Per-subscriber channel depth. Subscribers that fall further behind than
/// this see `RecvError::Lagged`, never a blocked publisher.
const CHANNEL_CAPACITY: usize = 32;

/// How long a toast stays on screen before auto-dismissing, in ms.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;

/// A classified authentication/authorization failure, delivered at most
/// once per failed call. Transient: nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthFailureEvent {
    pub kind: AuthFailureKind,
    pub message: String,
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Error,
    Warning,
    Info,
    Success,
}

/// A transient, auto-dismissing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastNotification {
    pub message: String,
    pub severity: ToastSeverity,
}

/// Process-wide event bus with independent failure and toast channels.
///
/// Cloning is cheap and every clone publishes into the same channels.
#[derive(Debug, Clone)]
pub struct AuthEventBus {
    failures: broadcast::Sender<AuthFailureEvent>,
    toasts: broadcast::Sender<ToastNotification>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        let (failures, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (toasts, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { failures, toasts }
    }

    pub fn subscribe_failures(&self) -> broadcast::Receiver<AuthFailureEvent> {
        self.failures.subscribe()
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<ToastNotification> {
        self.toasts.subscribe()
    }

    /// Broadcast a failure event. No return value: delivery with zero
    /// subscribers is a no-op, not an error.
    pub fn publish_failure(&self, event: AuthFailureEvent) {
        let _ = self.failures.send(event);
    }

    /// Broadcast a toast. Same fire-and-forget contract as
    /// [`publish_failure`](Self::publish_failure).
    pub fn publish_toast(&self, toast: ToastNotification) {
        let _ = self.toasts.send(toast);
    }
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new()
    }
}
