/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for citation processing.
//!
//! Only conditions that abort a document's bibliography processing are
//! represented here. Recoverable problems (unknown keys without
//! `bibtex-throw`, duplicate entries) go through [`crate::Diagnostics`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort bibliography processing for a document.
#[derive(Debug, Error)]
pub enum Error {
    /// The bibliography source file does not exist.
    #[error("File '{}' is not found", path.display())]
    SourceNotFound { path: PathBuf },

    /// The bibliography source file exists but could not be read.
    #[error("Failed to read bibliography file '{}': {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A citation key has no entry and `bibtex-throw` is enabled.
    #[error("Unknown bibliography reference: {key}")]
    UnknownReference { key: String },

    /// The citation style engine failed to parse or render.
    #[error("Citation style engine error: {message}")]
    StyleEngine { message: String },

    /// A style or locale catalog could not be decoded.
    #[error("Invalid catalog: {message}")]
    InvalidCatalog { message: String },
}

impl Error {
    /// Whether this error stems from missing or unreadable configuration
    /// rather than from document content.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound { .. } | Error::SourceUnreadable { .. }
        )
    }

    pub fn style_engine(message: impl Into<String>) -> Self {
        Error::StyleEngine {
            message: message.into(),
        }
    }
}

/// Result type for citation processing.
pub type Result<T> = std::result::Result<T, Error>;
