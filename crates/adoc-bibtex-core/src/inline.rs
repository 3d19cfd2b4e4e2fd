/*
 * inline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Replacement text for citation macros.
 */

//! Inline citation rendering.
//!
//! `bibitem` macros are replaced by the full styled entry. `cite` and
//! `citenp` macros depend on the output format:
//!
//! - LaTeX family: one `\cite`-style command per key, emitted as passthrough.
//!   Under biblatex `citenp` becomes `\textcite` and `cite` becomes
//!   `\parencite`; plain LaTeX has no such distinction.
//! - AsciiDoc: numeric labels taken from the citation registry, optionally
//!   linked to `bibliography_entry_<key>` anchors, wrapped in a `citation`
//!   role span.

use crate::catalog::StyleSelection;
use crate::config::{OutputFormat, RenderConfig};
use crate::database::BibliographyDatabase;
use crate::diagnostics::{Diagnostics, codes};
use crate::engine::CitationStyleEngine;
use crate::error::{Error, Result};
use crate::output::Rendered;
use crate::registry::CitationRegistry;
use crate::scanner::{KeyItem, MacroKind, MacroMatch};

/// Prefix of the anchor generated for each bibliography entry.
pub const ANCHOR_PREFIX: &str = "bibliography_entry_";

/// Anchor name for `key`.
pub fn anchor_for(key: &str) -> String {
    format!("{}{}", ANCHOR_PREFIX, key)
}

/// Renders matched macros for one document.
pub struct InlineRenderer<'a, E: CitationStyleEngine> {
    pub engine: &'a E,
    pub database: &'a BibliographyDatabase<E::Entry>,
    pub config: &'a RenderConfig,
    pub selection: &'a StyleSelection,
}

impl<E: CitationStyleEngine> InlineRenderer<'_, E> {
    /// Produce the replacement for `found`.
    ///
    /// Citation keys that are not yet registered are registered here, so a
    /// document can be processed in a single combined pass.
    pub fn render(
        &self,
        found: &MacroMatch,
        registry: &mut CitationRegistry,
        diagnostics: &mut Diagnostics,
    ) -> Result<Rendered> {
        match found.kind {
            MacroKind::Bibitem => self.render_bibitem(found.bibitem_key(), diagnostics),
            MacroKind::Cite | MacroKind::Citenp => match self.config.format {
                OutputFormat::Asciidoc => {
                    self.render_asciidoc(&found.items, registry, diagnostics)
                }
                OutputFormat::Latex | OutputFormat::Bibtex => {
                    Ok(render_latex("cite", &found.items, registry))
                }
                OutputFormat::Biblatex => {
                    let command = match found.kind {
                        MacroKind::Citenp => "textcite",
                        _ => "parencite",
                    };
                    Ok(render_latex(command, &found.items, registry))
                }
            },
        }
    }

    fn render_bibitem(&self, key: &str, diagnostics: &mut Diagnostics) -> Result<Rendered> {
        let Some(entry) = self.database.get(key) else {
            diagnostics.error(
                codes::UNKNOWN_REFERENCE,
                format!("Unknown bibliography reference: {}", key),
            );
            return Ok(Rendered::Text(key.to_string()));
        };
        let rendered = self
            .engine
            .render(std::slice::from_ref(entry), self.selection)?;
        Ok(Rendered::Text(rendered.concat().trim().to_string()))
    }

    fn render_asciidoc(
        &self,
        items: &[KeyItem],
        registry: &mut CitationRegistry,
        diagnostics: &mut Diagnostics,
    ) -> Result<Rendered> {
        let template = &self.config.template;
        let mut labels = Vec::with_capacity(items.len());

        for item in items {
            let key = item.id.as_str();
            registry.register(key);

            let label = if self.database.contains(key) {
                let number = registry.index_of(key).map_or(0, |index| index + 1);
                template.wrap(&number.to_string())
            } else if self.config.throw_on_unknown {
                return Err(Error::UnknownReference {
                    key: key.to_string(),
                });
            } else {
                diagnostics.error(
                    codes::UNKNOWN_REFERENCE,
                    format!("Unknown bibliography reference: {}", key),
                );
                template.wrap(key)
            };

            if self.config.links {
                labels.push(format!("<<{},{}>>", anchor_for(key), label));
            } else {
                labels.push(label);
            }
        }

        Ok(Rendered::Text(format!("[.citation]#{}#", labels.join("; "))))
    }
}

/// `\<command>[p.<qualifier>]{bibliography_entry_<key>}` per item, joined by `,`.
///
/// Every key is registered, whether or not the database knows it.
fn render_latex(command: &str, items: &[KeyItem], registry: &mut CitationRegistry) -> Rendered {
    let commands: Vec<String> = items
        .iter()
        .map(|item| {
            registry.register(&item.id);
            let locator = item
                .qualifier
                .as_ref()
                .map_or_else(String::new, |q| format!("[p.{}]", q));
            format!("\\{}{}{{{}}}", command, locator, anchor_for(&item.id))
        })
        .collect();
    Rendered::Passthrough(commands.join(","))
}
