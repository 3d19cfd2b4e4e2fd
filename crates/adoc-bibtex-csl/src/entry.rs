/*
 * entry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bibliography entries backed by hayagriva.

use adoc_bibtex_core::BibliographicEntry;
use hayagriva::Entry;
use hayagriva::types::EntryType;

/// A parsed BibLaTeX entry.
#[derive(Debug, Clone)]
pub struct CslEntry(pub(crate) Entry);

impl CslEntry {
    /// A `misc` entry whose title is `key`.
    ///
    /// Falls back to an untitled entry when the key cannot be written as
    /// BibLaTeX (for instance when it contains braces).
    pub fn placeholder(key: &str) -> Self {
        let source = format!("@misc{{{key},\n  title = {{{key}}},\n}}");
        let parsed = hayagriva::io::from_biblatex_str(&source)
            .ok()
            .and_then(|library| library.iter().next().cloned());
        CslEntry(parsed.unwrap_or_else(|| Entry::new(key, EntryType::Misc)))
    }

    pub fn inner(&self) -> &Entry {
        &self.0
    }

    pub fn title(&self) -> Option<String> {
        self.0.title().map(|title| title.to_string())
    }
}

impl From<Entry> for CslEntry {
    fn from(entry: Entry) -> Self {
        CslEntry(entry)
    }
}

impl BibliographicEntry for CslEntry {
    fn id(&self) -> &str {
        self.0.key()
    }

    fn author_family_names(&self) -> Vec<String> {
        self.0
            .authors()
            .map(|people| people.iter().map(|p| p.name.clone()).collect())
            .unwrap_or_default()
    }

    fn editor(&self) -> Option<String> {
        let editors = self.0.editors()?;
        if editors.is_empty() {
            return None;
        }
        Some(
            editors
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    fn issued_date_parts(&self) -> Vec<i32> {
        let Some(date) = self.0.date() else {
            return Vec::new();
        };
        // Month and day are stored zero-based.
        let mut parts = vec![date.year];
        if let Some(month) = date.month {
            parts.push(i32::from(month) + 1);
            if let Some(day) = date.day {
                parts.push(i32::from(day) + 1);
            }
        }
        parts
    }
}
