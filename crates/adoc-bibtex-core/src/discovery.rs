/*
 * discovery.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Locating the bibliography file for a document.
//!
//! Only the document's own directory tree is searched. The working directory
//! and user-level locations are never consulted, so the same document always
//! resolves to the same file.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Resolve a configured `bibtex-file` value.
///
/// The path is tried relative to `base_dir` first and used as given otherwise.
pub fn resolve_configured(base_dir: &Path, configured: &str) -> PathBuf {
    let relative = base_dir.join(configured);
    if relative.exists() {
        relative
    } else {
        PathBuf::from(configured)
    }
}

/// Find the shallowest `*.bib` file below `base_dir`.
///
/// Among files at the same depth the first in path order wins. Entries that
/// cannot be read, including dangling symlinks, are skipped.
pub fn discover_bibliography(base_dir: &Path) -> Option<PathBuf> {
    WalkDir::new(base_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".bib"))
        .min_by(|a, b| {
            a.depth()
                .cmp(&b.depth())
                .then_with(|| a.path().cmp(b.path()))
        })
        .map(walkdir::DirEntry::into_path)
}

/// Where the bibliography for a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BibliographySource {
    /// Set through the `bibtex-file` attribute or the bibliography macro.
    Configured(PathBuf),
    /// Found by searching the document directory.
    Discovered(PathBuf),
}

impl BibliographySource {
    pub fn path(&self) -> &Path {
        match self {
            BibliographySource::Configured(path) | BibliographySource::Discovered(path) => path,
        }
    }

    /// Use the configured file when there is one, otherwise search `base_dir`.
    pub fn locate(base_dir: &Path, configured: Option<&str>) -> Option<Self> {
        match configured.filter(|value| !value.is_empty()) {
            Some(value) => Some(BibliographySource::Configured(resolve_configured(
                base_dir, value,
            ))),
            None => discover_bibliography(base_dir).map(BibliographySource::Discovered),
        }
    }
}
