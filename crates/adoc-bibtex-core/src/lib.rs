//! Citation resolution and bibliography assembly for AsciiDoc documents.
//!
//! This crate turns `cite:[...]`, `citenp:[...]` and `bibitem:[...]` macros
//! into rendered citations and fills bibliography placeholders. It takes:
//! - a BibTeX source, parsed by a [`CitationStyleEngine`]
//! - document attributes, read into a [`RenderConfig`]
//! - a [`Catalog`] of CSL styles and locales
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     pipeline (DocumentHost)                         │
//! │          locate bibliography → detect → reorder → render            │
//! └───────────────────────────┬─────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                BibliographyProcessor (per document)                 │
//! │     scanner + CitationRegistry + inline renderer + assembler        │
//! └───────────────────────────┬─────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  CitationStyleEngine (pluggable)                    │
//! │            BibTeX parsing and CSL rendering of entries              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use adoc_bibtex_core::{BibliographyProcessor, Catalog, RenderConfig};
//!
//! let mut processor =
//!     BibliographyProcessor::open(engine, "refs.bib", RenderConfig::default(), &Catalog::default())?;
//! for line in &lines {
//!     processor.detect_macros(line);
//! }
//! processor.reorder();
//! let rendered = processor.process_line("As shown in cite:[knuth84].")?;
//! ```

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod database;
pub mod diagnostics;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod inline;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod registry;
pub mod scanner;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use catalog::{Catalog, LocaleCatalog, StyleCatalog, StyleSelection};
pub use config::{Attributes, CitationOrder, CitationTemplate, OutputFormat, RenderConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use engine::{BibliographicEntry, CitationStyleEngine};
pub use error::{Error, Result};
pub use output::Rendered;
pub use pipeline::{DocumentHost, Outcome, Report, process_document};
pub use processor::BibliographyProcessor;
pub use registry::CitationRegistry;
