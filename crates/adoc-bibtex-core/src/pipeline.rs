/*
 * pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Runs citation processing over a host document.
 */

//! Document-level driver.
//!
//! The host document model is abstract: anything that can list its prose
//! fragments, accept rewritten fragments and inject bibliography lines can be
//! processed by implementing [`DocumentHost`]. [`process_document`] then runs
//! the full detect, reorder and render sequence.
//!
//! Rewrites are computed first and applied only once every fragment rendered
//! successfully, so a fatal error leaves the host untouched.

use std::path::Path;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::{ATTR_FILE, Attributes, RenderConfig};
use crate::diagnostics::{Diagnostic, Diagnostics, codes};
use crate::discovery::BibliographySource;
use crate::engine::CitationStyleEngine;
use crate::error::Result;
use crate::output::Rendered;
use crate::processor::BibliographyProcessor;

/// A document that citation processing can read from and write back to.
pub trait DocumentHost: Attributes {
    /// Directory used to resolve and discover the bibliography file.
    fn base_dir(&self) -> &Path;

    /// Prose fragments that may contain citation macros, in document order.
    fn fragments(&self) -> Vec<String>;

    /// Replace the fragment at `index` (as returned by [`fragments`](Self::fragments)).
    fn replace_fragment(&mut self, index: usize, text: String);

    /// Number of places where a bibliography should be injected.
    fn bibliography_placeholders(&self) -> usize;

    /// Fill every bibliography placeholder with `lines`.
    fn inject_bibliography(&mut self, lines: &[Rendered]);
}

/// What happened to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Citations were rendered and the bibliography injected.
    Processed {
        /// Distinct citation keys in the final registry.
        citations: usize,
        /// Fragments rewritten.
        fragments: usize,
    },
    /// Nothing was changed; see the report's diagnostics for why.
    Skipped,
}

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Process citations and bibliography placeholders in `host`.
///
/// A missing bibliography file, configured or discovered, is reported as a
/// warning and the document is returned unmodified. An unknown key with
/// `bibtex-throw` enabled, or a style engine failure, is returned as an
/// error, also without modifying the document.
pub fn process_document<H, E>(host: &mut H, engine: E, catalog: &Catalog) -> Result<Report>
where
    H: DocumentHost,
    E: CitationStyleEngine,
{
    let mut diagnostics = Diagnostics::new();
    let config = RenderConfig::from_attributes(&*host);

    let Some(source) = BibliographySource::locate(host.base_dir(), host.attribute(ATTR_FILE))
    else {
        diagnostics.warn(
            codes::SKIPPED,
            "bibtex-file is not set and automatic search failed, all bibtex updates will be skipped",
        );
        return Ok(skipped(diagnostics));
    };
    debug!(source = ?source, "Using bibliography");

    let fragments = host.fragments();
    if fragments.is_empty() && host.bibliography_placeholders() == 0 {
        return Ok(skipped(diagnostics));
    }

    let mut processor = match BibliographyProcessor::open(engine, source.path(), config, catalog) {
        Ok(processor) => processor,
        Err(err) if err.is_configuration() => {
            diagnostics.warn(codes::CONFIGURATION, err.to_string());
            return Ok(skipped(diagnostics));
        }
        Err(err) => return Err(err),
    };

    let with_macros: Vec<usize> = fragments
        .iter()
        .enumerate()
        .filter_map(|(index, text)| processor.detect_macros(text).then_some(index))
        .collect();

    processor.reorder();

    let mut rewrites = Vec::with_capacity(with_macros.len());
    for index in with_macros {
        rewrites.push((index, processor.process_line(&fragments[index])?));
    }

    let bibliography = if host.bibliography_placeholders() > 0 {
        Some(processor.bibliography()?)
    } else {
        None
    };

    let rewritten = rewrites.len();
    for (index, text) in rewrites {
        host.replace_fragment(index, text);
    }
    if let Some(lines) = bibliography {
        host.inject_bibliography(&lines);
    }

    let citations = processor.registry().len();
    info!(citations, fragments = rewritten, "Processed citations");
    diagnostics.extend(processor.take_diagnostics());
    Ok(Report {
        outcome: Outcome::Processed {
            citations,
            fragments: rewritten,
        },
        diagnostics: diagnostics.take(),
    })
}

fn skipped(mut diagnostics: Diagnostics) -> Report {
    Report {
        outcome: Outcome::Skipped,
        diagnostics: diagnostics.take(),
    }
}
