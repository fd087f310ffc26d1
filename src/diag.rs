// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Injected diagnostics sink.
//!
//! The security layer never writes to process-wide output streams directly.
//! Components hold a [`DiagnosticsSink`] and emit structured events through
//! it; [`TracingSink`] is the production implementation, [`MemorySink`] lets
//! tests assert on emitted diagnostics.

use std::sync::Mutex;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single emitted diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Sink for structured diagnostic events.
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Production sink: forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}

/// Capturing sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.events.lock().expect("diagnostics lock poisoned").clone()
    }

    /// True if any event at `severity` contains `fragment`.
    pub fn contains(&self, severity: Severity, fragment: &str) -> bool {
        self.snapshot()
            .iter()
            .any(|d| d.severity == severity && d.message.contains(fragment))
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&self, severity: Severity, message: &str) {
        self.events
            .lock()
            .expect("diagnostics lock poisoned")
            .push(Diagnostic {
                severity,
                message: message.to_string(),
            });
    }
}
