/*
 * assembler.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliography lines injected at each bibliography placeholder.

use std::path::Path;

use crate::catalog::StyleSelection;
use crate::config::{OutputFormat, RenderConfig};
use crate::database::BibliographyDatabase;
use crate::engine::CitationStyleEngine;
use crate::error::Result;
use crate::output::Rendered;
use crate::registry::CitationRegistry;

/// Build the bibliography for the current registry order.
///
/// LaTeX outputs get fixed commands that hand the bibliography over to the
/// LaTeX toolchain. AsciiDoc output renders one entry per registered key
/// through the engine; keys without an entry are rendered from a placeholder
/// whose title is the key. Nothing is mutated, so repeated calls agree.
pub fn assemble_bibliography<E: CitationStyleEngine>(
    engine: &E,
    database: &BibliographyDatabase<E::Entry>,
    registry: &CitationRegistry,
    config: &RenderConfig,
    selection: &StyleSelection,
    source_path: &Path,
) -> Result<Vec<Rendered>> {
    match config.format {
        OutputFormat::Latex | OutputFormat::Bibtex => Ok(vec![
            Rendered::Passthrough(format!("\\bibliography{{{}}}{{}}", source_path.display())),
            Rendered::Passthrough(format!("\\bibliographystyle{{{}}}", config.style)),
        ]),
        OutputFormat::Biblatex => Ok(vec![Rendered::Passthrough(
            "\\printbibliography".to_string(),
        )]),
        OutputFormat::Asciidoc => {
            if registry.is_empty() {
                return Ok(Vec::new());
            }
            let entries: Vec<E::Entry> = registry
                .keys()
                .map(|key| match database.get(key) {
                    Some(entry) => entry.clone(),
                    None => engine.placeholder(key),
                })
                .collect();
            let rendered = engine.render(&entries, selection)?;
            Ok(rendered.into_iter().map(Rendered::Text).collect())
        }
    }
}
