/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Citation keys in the order they are numbered.
//!
//! Keys are recorded the first time they are referenced. Before inline
//! citations are rendered the registry is either left in that order or
//! sorted by author and date, see [`CitationRegistry::reorder`].

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::config::CitationOrder;
use crate::database::BibliographyDatabase;
use crate::engine::BibliographicEntry;

const SORT_SEPARATOR: &str = "||";

/// Ordered set of citation keys referenced by a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationRegistry {
    keys: IndexSet<String>,
}

impl CitationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` unless it is already registered.
    pub fn register(&mut self, key: &str) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_string());
        }
    }

    /// 0-based position of `key`.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Apply the configured ordering.
    ///
    /// `Appearance` keeps the registry as is. `Sorted` orders keys by
    /// [`sort_key`], computed once per key; ties keep their registration order.
    pub fn reorder<E: BibliographicEntry>(
        &mut self,
        order: CitationOrder,
        database: &BibliographyDatabase<E>,
    ) {
        if order == CitationOrder::Appearance {
            return;
        }
        let sort_keys: HashMap<&str, String> = self
            .keys
            .iter()
            .map(|key| (key.as_str(), sort_key(key, database.get(key))))
            .collect();

        let mut ordered: Vec<&String> = self.keys.iter().collect();
        // `sort_by` on slices is stable.
        ordered.sort_by(|a, b| sort_keys[a.as_str()].cmp(&sort_keys[b.as_str()]));
        let keys: IndexSet<String> = ordered.into_iter().cloned().collect();
        self.keys = keys;
    }
}

/// The string a key is sorted by.
///
/// Author family names (or the editor when there are no authors) joined by
/// `||`, then `||` and each issued date part padded to four digits. Keys
/// without an entry or without any of those fields sort by the key itself.
pub fn sort_key<E: BibliographicEntry>(key: &str, entry: Option<&E>) -> String {
    let Some(entry) = entry else {
        return key.to_string();
    };

    let mut acc = String::new();
    let authors = entry.author_family_names();
    if !authors.is_empty() {
        acc.push_str(&authors.join(SORT_SEPARATOR));
    } else if let Some(editor) = entry.editor() {
        acc.push_str(&editor);
    }
    for part in entry.issued_date_parts() {
        acc.push_str(SORT_SEPARATOR);
        acc.push_str(&format!("{:0>4}", part.to_string()));
    }

    if acc.is_empty() { key.to_string() } else { acc }
}
