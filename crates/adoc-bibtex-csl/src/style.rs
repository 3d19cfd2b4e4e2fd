/*
 * style.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Loading CSL styles and locales for a style selection.
 */

use adoc_bibtex_core::{Error, Result, StyleSelection};
use hayagriva::archive::{ArchivedStyle, locales};
use hayagriva::citationberg::{IndependentStyle, Locale, LocaleFile, Style};
use tracing::debug;

/// The independent style to render with.
///
/// Catalog content wins over the bundled style archive. Dependent styles
/// are not followed here; the catalog resolves its own parents.
pub fn load_style(selection: &StyleSelection) -> Result<IndependentStyle> {
    if let Some(content) = &selection.style_content {
        debug!(style = %selection.style, "Using catalog style");
        return IndependentStyle::from_xml(content).map_err(|e| {
            Error::style_engine(format!("invalid CSL style '{}': {}", selection.style, e))
        });
    }

    let archived = ArchivedStyle::by_name(&selection.style).ok_or_else(|| {
        Error::style_engine(format!("style '{}' not found", selection.style))
    })?;
    match archived.get() {
        Style::Independent(style) => Ok(style),
        Style::Dependent(_) => Err(Error::style_engine(format!(
            "style '{}' is a dependent style",
            selection.style
        ))),
    }
}

/// Locale files available to the engine, catalog content first.
pub fn load_locales(selection: &StyleSelection) -> Result<Vec<Locale>> {
    let mut all = Vec::new();
    if let Some(content) = &selection.locale_content {
        let file = LocaleFile::from_xml(content).map_err(|e| {
            Error::style_engine(format!("invalid CSL locale '{}': {}", selection.locale, e))
        })?;
        all.push(file.into());
    }
    all.extend(locales());
    Ok(all)
}
