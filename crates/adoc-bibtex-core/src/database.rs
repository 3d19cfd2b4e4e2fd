/*
 * database.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parsed bibliography entries keyed by citation ID.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, codes};
use crate::engine::BibliographicEntry;

/// Bibliography entries for one document, immutable once built.
#[derive(Debug, Clone)]
pub struct BibliographyDatabase<E> {
    entries: HashMap<String, E>,
}

impl<E: BibliographicEntry> BibliographyDatabase<E> {
    /// Index entries by ID.
    ///
    /// When an ID is defined more than once the later definition wins and a
    /// warning is reported.
    pub fn from_entries(
        entries: impl IntoIterator<Item = E>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut indexed = HashMap::new();
        for entry in entries {
            let id = entry.id().to_string();
            if indexed.contains_key(&id) {
                diagnostics.warn(
                    codes::DUPLICATE_ENTRY,
                    format!(
                        "Bibliography entry with ID {} is present more than once, only the last entry found will be used.",
                        id
                    ),
                );
            }
            indexed.insert(id, entry);
        }
        Self { entries: indexed }
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
