/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The single reporting channel for non-fatal problems.
//!
//! Every message is recorded (so callers and tests can inspect what was
//! reported for a document) and mirrored to `tracing` at the matching level.

use std::fmt;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A problem with document content; processing continued with fallback text.
    Error,
    /// A problem that does not affect the rendered output.
    Warning,
}

/// Stable diagnostic codes, subsystem `B`.
pub mod codes {
    /// A citation key has no bibliography entry.
    pub const UNKNOWN_REFERENCE: &str = "B-1";
    /// The bibliography source defines an entry ID more than once.
    pub const DUPLICATE_ENTRY: &str = "B-2";
    /// The bibliography source could not be loaded.
    pub const CONFIGURATION: &str = "B-3";
    /// Bibliography processing was skipped for the document.
    pub const SKIPPED: &str = "B-4";
}

/// A reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", label, self.code, self.message)
    }
}

/// Accumulates diagnostics for one document pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(code, "{}", message);
        self.messages.push(Diagnostic {
            kind: DiagnosticKind::Error,
            code,
            message,
        });
    }

    pub fn warn(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(code, "{}", message);
        self.messages.push(Diagnostic {
            kind: DiagnosticKind::Warning,
            code,
            message,
        });
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Move all messages out of the sink.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.messages)
    }

    /// Append messages reported elsewhere, keeping their order.
    pub fn extend(&mut self, other: Vec<Diagnostic>) {
        self.messages.extend(other);
    }
}
