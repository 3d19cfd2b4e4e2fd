/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The citation style engine boundary.
//!
//! The processor never inspects bibliography source syntax or CSL style
//! semantics itself. It asks a [`CitationStyleEngine`] to turn source text
//! into entries and to render entries for a [`StyleSelection`]. Entries only
//! need to expose the few fields used for ordering, see [`BibliographicEntry`].

use crate::catalog::StyleSelection;
use crate::error::Result;

/// The fields of a bibliography entry the processor looks at.
pub trait BibliographicEntry: Clone {
    /// The citation key.
    fn id(&self) -> &str;

    /// Family names of the authors, in order. Empty when there are no authors.
    fn author_family_names(&self) -> Vec<String>;

    /// Editor text used for ordering when there are no authors.
    fn editor(&self) -> Option<String>;

    /// Parts of the issued date (year, month, day), as many as are known.
    fn issued_date_parts(&self) -> Vec<i32>;
}

/// Parses bibliography sources and renders styled bibliography text.
pub trait CitationStyleEngine {
    type Entry: BibliographicEntry;

    /// Parse raw bibliography source into entries, in source order.
    fn parse(&self, source: &str) -> Result<Vec<Self::Entry>>;

    /// A stand-in entry for a cited key that has no definition; its title is `key`.
    fn placeholder(&self, key: &str) -> Self::Entry;

    /// Render one bibliography string per entry, in the order given.
    ///
    /// Implementations must not re-sort the entries.
    fn render(&self, entries: &[Self::Entry], selection: &StyleSelection) -> Result<Vec<String>>;
}
