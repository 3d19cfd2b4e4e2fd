//! CSL citation style engine for adoc-bibtex, backed by hayagriva.
//!
//! [`HayagrivaEngine`] parses BibLaTeX/BibTeX sources with
//! `hayagriva::io::from_biblatex_str`, keeping repeated keys, and renders
//! bibliography entries with hayagriva's CSL driver. Styles and locales come from the document's
//! [`StyleSelection`] when it carries content, and from hayagriva's bundled
//! archive otherwise.
//!
//! The driver may order the bibliography by the style's own sort rules;
//! rendered items are put back into the order they were requested in.

mod entry;
mod source;
mod style;

use std::collections::HashMap;

use adoc_bibtex_core::{CitationStyleEngine, Error, Result, StyleSelection};
use hayagriva::citationberg::LocaleCode;
use hayagriva::{
    BibliographyDriver, BibliographyRequest, BufWriteFormat, CitationItem, CitationRequest,
};
use tracing::debug;

pub use entry::CslEntry;
pub use style::{load_locales, load_style};

#[derive(Debug, Clone, Copy, Default)]
pub struct HayagrivaEngine;

impl HayagrivaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CitationStyleEngine for HayagrivaEngine {
    type Entry = CslEntry;

    fn parse(&self, source: &str) -> Result<Vec<CslEntry>> {
        Ok(source::parse_entries(source)?
            .into_iter()
            .map(CslEntry::from)
            .collect())
    }

    fn placeholder(&self, key: &str) -> CslEntry {
        CslEntry::placeholder(key)
    }

    fn render(&self, entries: &[CslEntry], selection: &StyleSelection) -> Result<Vec<String>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let style = load_style(selection)?;
        let locales = load_locales(selection)?;

        let mut driver = BibliographyDriver::new();
        for entry in entries {
            let items = vec![CitationItem::with_entry(entry.inner())];
            driver.citation(CitationRequest::from_items(items, &style, &locales));
        }
        let result = driver.finish(BibliographyRequest {
            style: &style,
            locale: Some(LocaleCode(selection.locale.clone())),
            locale_files: &locales,
        });

        let Some(bibliography) = result.bibliography else {
            return Err(Error::style_engine(format!(
                "style '{}' has no bibliography layout",
                selection.style
            )));
        };

        let mut by_key: HashMap<String, String> = HashMap::new();
        for item in bibliography.items {
            let mut text = String::new();
            if let Some(first) = &item.first_field {
                first
                    .write_buf(&mut text, BufWriteFormat::Plain)
                    .map_err(|e| Error::style_engine(e.to_string()))?;
                text.push(' ');
            }
            item.content
                .write_buf(&mut text, BufWriteFormat::Plain)
                .map_err(|e| Error::style_engine(e.to_string()))?;
            by_key.insert(item.key, text.trim().to_string());
        }
        debug!(
            requested = entries.len(),
            rendered = by_key.len(),
            style = %selection.style,
            "Rendered bibliography"
        );

        entries
            .iter()
            .map(|entry| {
                let key = entry.inner().key();
                by_key.get(key).cloned().ok_or_else(|| {
                    Error::style_engine(format!(
                        "style '{}' rendered no bibliography item for '{}'",
                        selection.style, key
                    ))
                })
            })
            .collect()
    }
}
