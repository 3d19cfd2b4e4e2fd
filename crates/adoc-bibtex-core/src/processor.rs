/*
 * processor.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-document citation state and the detect/reorder/render passes.
 */

//! Citation processor for a single document.
//!
//! A [`BibliographyProcessor`] owns everything needed to process one
//! document: the parsed bibliography, the citation registry, the rendering
//! configuration and the diagnostics reported so far. Processing runs in
//! three steps:
//!
//! 1. [`detect_macros`](BibliographyProcessor::detect_macros) on every
//!    fragment, registering cited keys in order of appearance;
//! 2. [`reorder`](BibliographyProcessor::reorder), once;
//! 3. [`process_line`](BibliographyProcessor::process_line) on every fragment
//!    that contained macros, then
//!    [`bibliography`](BibliographyProcessor::bibliography) for each
//!    placeholder.
//!
//! Skipping step 1 is allowed: rendering registers unseen keys on the fly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::assembler::assemble_bibliography;
use crate::catalog::{Catalog, StyleSelection};
use crate::config::RenderConfig;
use crate::database::BibliographyDatabase;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::CitationStyleEngine;
use crate::error::{Error, Result};
use crate::inline::InlineRenderer;
use crate::output::Rendered;
use crate::registry::CitationRegistry;
use crate::scanner::{MacroKind, replace_macros, scan};

pub struct BibliographyProcessor<E: CitationStyleEngine> {
    engine: E,
    source_path: PathBuf,
    database: BibliographyDatabase<E::Entry>,
    registry: CitationRegistry,
    config: RenderConfig,
    selection: StyleSelection,
    diagnostics: Diagnostics,
}

impl<E: CitationStyleEngine> BibliographyProcessor<E> {
    /// Read and parse the bibliography at `source_path`.
    ///
    /// Fails before doing anything else when the file is missing or unreadable.
    pub fn open(
        engine: E,
        source_path: impl Into<PathBuf>,
        config: RenderConfig,
        catalog: &Catalog,
    ) -> Result<Self> {
        let source_path = source_path.into();
        if !source_path.is_file() {
            return Err(Error::SourceNotFound { path: source_path });
        }
        let source =
            std::fs::read_to_string(&source_path).map_err(|source| Error::SourceUnreadable {
                path: source_path.clone(),
                source,
            })?;
        Self::from_source(engine, &source, source_path, config, catalog)
    }

    /// Parse an already loaded bibliography source.
    pub fn from_source(
        engine: E,
        source: &str,
        source_path: impl Into<PathBuf>,
        config: RenderConfig,
        catalog: &Catalog,
    ) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let entries = engine.parse(source)?;
        let database = BibliographyDatabase::from_entries(entries, &mut diagnostics);
        let selection = catalog.select(&config.style, &config.locale);
        debug!(
            entries = database.len(),
            style = %config.style,
            locale = %config.locale,
            format = %config.format,
            "Loaded bibliography"
        );
        Ok(Self {
            engine,
            source_path: source_path.into(),
            database,
            registry: CitationRegistry::new(),
            config,
            selection,
            diagnostics,
        })
    }

    /// Register the keys cited in `line` and report whether it has any macro.
    ///
    /// `bibitem` macros count as found but are never registered. Running
    /// this again over the same text changes nothing.
    pub fn detect_macros(&mut self, line: &str) -> bool {
        let found = scan(line);
        for m in &found {
            match m.kind {
                MacroKind::Bibitem => {}
                MacroKind::Cite | MacroKind::Citenp => {
                    for item in &m.items {
                        self.registry.register(&item.id);
                    }
                }
            }
        }
        !found.is_empty()
    }

    /// Apply the configured citation order to the registry.
    pub fn reorder(&mut self) {
        self.registry.reorder(self.config.order, &self.database);
        debug!(keys = self.registry.len(), order = ?self.config.order, "Reordered citations");
    }

    /// Replace every macro in `line` with its rendered text.
    pub fn process_line(&mut self, line: &str) -> Result<String> {
        let renderer = InlineRenderer {
            engine: &self.engine,
            database: &self.database,
            config: &self.config,
            selection: &self.selection,
        };
        let registry = &mut self.registry;
        let diagnostics = &mut self.diagnostics;
        replace_macros(line, |found| {
            renderer
                .render(found, registry, diagnostics)
                .map(|rendered| rendered.to_asciidoc())
        })
    }

    /// The lines to inject at a bibliography placeholder.
    pub fn bibliography(&self) -> Result<Vec<Rendered>> {
        assemble_bibliography(
            &self.engine,
            &self.database,
            &self.registry,
            &self.config,
            &self.selection,
            &self.source_path,
        )
    }

    pub fn registry(&self) -> &CitationRegistry {
        &self.registry
    }

    pub fn database(&self) -> &BibliographyDatabase<E::Entry> {
        &self.database
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.messages()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CitationOrder, OutputFormat};
    use crate::scanner::has_macros;
    use crate::test_support::FakeEngine;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "knuth | Knuth | | 1984 | Literate Programming\n\
                          dijkstra | Dijkstra | | 1968 | Go To Statement Considered Harmful\n\
                          hoare | Hoare | | 1978 | Communicating Sequential Processes";

    fn processor(config: RenderConfig) -> BibliographyProcessor<FakeEngine> {
        BibliographyProcessor::from_source(
            FakeEngine,
            SOURCE,
            "refs.bib",
            config,
            &Catalog::default(),
        )
        .unwrap()
    }

    fn keys(p: &BibliographyProcessor<FakeEngine>) -> Vec<&str> {
        p.registry().keys().collect()
    }

    #[test]
    fn test_detect_registers_cite_keys_only() {
        let mut p = processor(RenderConfig::default());
        assert!(p.detect_macros("See cite:[knuth, hoare(12)] and bibitem:[dijkstra]."));
        assert!(p.detect_macros("Also citenp:[dijkstra,knuth]."));
        assert!(!p.detect_macros("Plain prose."));
        assert!(p.detect_macros("Only bibitem:[hoare] here."));
        assert_eq!(keys(&p), vec!["knuth", "hoare", "dijkstra"]);
    }

    #[test]
    fn test_detect_is_idempotent() {
        let mut p = processor(RenderConfig::default());
        let lines = ["cite:[hoare]", "cite:[knuth,hoare]"];
        for line in lines {
            p.detect_macros(line);
        }
        let first = p.registry().clone();
        for line in lines {
            p.detect_macros(line);
        }
        assert_eq!(p.registry(), &first);
    }

    #[test]
    fn test_sorted_labels_follow_registry() {
        let mut p = processor(RenderConfig::default());
        p.detect_macros("cite:[knuth] then cite:[hoare] then cite:[dijkstra]");
        p.reorder();
        assert_eq!(keys(&p), vec!["dijkstra", "hoare", "knuth"]);

        let out = p.process_line("cite:[knuth] then cite:[hoare] then cite:[dijkstra]").unwrap();
        assert_eq!(
            out,
            "[.citation]#[3]# then [.citation]#[2]# then [.citation]#[1]#"
        );
        for key in ["dijkstra", "hoare", "knuth"] {
            let label = format!("[{}]", p.registry().index_of(key).unwrap() + 1);
            let line = p.process_line(&format!("cite:[{}]", key)).unwrap();
            assert_eq!(line, format!("[.citation]#{}#", label));
        }
    }

    #[test]
    fn test_appearance_order() {
        let mut p = processor(RenderConfig {
            order: CitationOrder::Appearance,
            ..RenderConfig::default()
        });
        p.detect_macros("cite:[knuth,hoare]");
        p.reorder();
        assert_eq!(p.process_line("cite:[hoare]").unwrap(), "[.citation]#[2]#");
    }

    #[test]
    fn test_combined_single_pass() {
        let mut p = processor(RenderConfig::default());
        assert_eq!(
            p.process_line("cite:[hoare] cite:[knuth]").unwrap(),
            "[.citation]#[1]# [.citation]#[2]#"
        );
        assert_eq!(keys(&p), vec!["hoare", "knuth"]);
    }

    #[test]
    fn test_rendered_text_has_no_macros() {
        let mut p = processor(RenderConfig {
            links: false,
            ..RenderConfig::default()
        });
        let line = "cite:[knuth] citenp:pre[hoare(3), ghost] bibitem:[dijkstra]";
        p.detect_macros(line);
        p.reorder();
        let out = p.process_line(line).unwrap();
        assert!(!has_macros(&out), "macros left in: {}", out);
    }

    #[test]
    fn test_bracketed_key_does_not_reappear_as_macro() {
        let mut p = processor(RenderConfig {
            links: false,
            ..RenderConfig::default()
        });
        let line = "See cite:[cite:[x] and cite:[cite:[x, knuth].";
        p.detect_macros(line);
        p.reorder();
        let out = p.process_line(line).unwrap();
        assert_eq!(out, "See [.citation]## and [.citation]#[1]#.");
        assert!(!has_macros(&out), "macros left in: {}", out);
        assert_eq!(keys(&p), vec!["knuth"]);
    }

    #[test]
    fn test_latex_passthrough_in_line() {
        let mut p = processor(RenderConfig {
            format: OutputFormat::Latex,
            ..RenderConfig::default()
        });
        let out = p.process_line("As in cite:[knuth,ghost(23)].").unwrap();
        assert_eq!(
            out,
            r"As in +++\cite{bibliography_entry_knuth},\cite[p.23]{bibliography_entry_ghost}+++."
        );
        assert_eq!(keys(&p), vec!["knuth", "ghost"]);
    }

    #[test]
    fn test_throw_on_unknown_aborts_line() {
        let mut p = processor(RenderConfig {
            throw_on_unknown: true,
            ..RenderConfig::default()
        });
        let err = p.process_line("cite:[knuth] citenp:[ghost]").unwrap_err();
        assert_eq!(err.to_string(), "Unknown bibliography reference: ghost");
    }

    #[test]
    fn test_bibliography_after_reorder() {
        let mut p = processor(RenderConfig::default());
        p.detect_macros("cite:[knuth,ghost,dijkstra]");
        p.reorder();
        let lines: Vec<String> = p
            .bibliography()
            .unwrap()
            .iter()
            .map(Rendered::to_asciidoc)
            .collect();
        assert_eq!(
            lines,
            vec![
                "Dijkstra. Go To Statement Considered Harmful",
                "Knuth. Literate Programming",
                "ghost",
            ]
        );
    }

    #[test]
    fn test_duplicate_entries_reported_at_load() {
        let p = BibliographyProcessor::from_source(
            FakeEngine,
            "a | A | | 2000 | One\na | A | | 2000 | Two",
            "refs.bib",
            RenderConfig::default(),
            &Catalog::default(),
        )
        .unwrap();
        assert_eq!(p.diagnostics().len(), 1);
        assert_eq!(p.database().len(), 1);
    }

    #[test]
    fn test_open_missing_source() {
        let result = BibliographyProcessor::open(
            FakeEngine,
            "/definitely/not/here.bib",
            RenderConfig::default(),
            &Catalog::default(),
        );
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "File '/definitely/not/here.bib' is not found"
        );
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refs.bib");
        std::fs::write(&path, SOURCE).unwrap();
        let p = BibliographyProcessor::open(
            FakeEngine,
            &path,
            RenderConfig::default(),
            &Catalog::default(),
        )
        .unwrap();
        assert_eq!(p.database().len(), 3);
        assert_eq!(p.source_path(), path.as_path());
    }
}
