/*
 * catalog.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Preloaded CSL style and locale collections.
 */

//! Style and locale catalogs.
//!
//! A [`Catalog`] holds optional, preloaded CSL styles and locales that
//! override whatever the citation style engine ships with. It is passed to
//! the processor at construction and resolved once per document into a
//! [`StyleSelection`].
//!
//! Styles map a name either to inline CSL content or to the name of a parent
//! style (`short_parent`). Parent resolution is a single step: a parent that
//! itself names a parent is not followed.
//!
//! Locales use two tables: `mappings` turns a requested locale name into an
//! alias, and `locales` maps that alias to raw locale content.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// One named style in a [`StyleCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StyleEntry {
    /// Name of the independent style this dependent style reuses.
    #[serde(default)]
    pub short_parent: Option<String>,
    /// Raw CSL XML.
    #[serde(default)]
    pub content: Option<String>,
}

/// Named CSL styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StyleCatalog {
    pub styles: HashMap<String, StyleEntry>,
}

impl StyleCatalog {
    pub fn insert_content(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.styles.insert(
            name.into(),
            StyleEntry {
                short_parent: None,
                content: Some(content.into()),
            },
        );
    }

    pub fn insert_dependent(&mut self, name: impl Into<String>, parent: impl Into<String>) {
        self.styles.insert(
            name.into(),
            StyleEntry {
                short_parent: Some(parent.into()),
                content: None,
            },
        );
    }

    /// CSL content for `name`, following at most one `short_parent` link.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let mut entry = self.styles.get(name)?;
        if let Some(parent) = &entry.short_parent {
            entry = self.styles.get(parent)?;
        }
        entry.content.as_deref()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        load(path)
    }
}

/// Locale aliases and locale content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocaleCatalog {
    /// Requested locale name to alias, e.g. `en` to `en-US`.
    #[serde(default)]
    pub mappings: HashMap<String, String>,
    /// Alias to raw CSL locale XML.
    #[serde(default)]
    pub locales: HashMap<String, String>,
}

impl LocaleCatalog {
    /// Locale content for `name`, going through `mappings` when an alias exists.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let alias = self.mappings.get(name).map_or(name, String::as_str);
        self.locales.get(alias).map(String::as_str)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        load(path)
    }
}

/// Everything preloaded for the citation style engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub styles: StyleCatalog,
    pub locales: LocaleCatalog,
}

impl Catalog {
    pub fn new(styles: StyleCatalog, locales: LocaleCatalog) -> Self {
        Self { styles, locales }
    }

    /// Resolve the configured style and locale against this catalog.
    pub fn select(&self, style: &str, locale: &str) -> StyleSelection {
        StyleSelection {
            style: style.to_string(),
            style_content: self.styles.resolve(style).map(str::to_string),
            locale: locale.to_string(),
            locale_content: self.locales.resolve(locale).map(str::to_string),
        }
    }
}

/// The style and locale the engine renders with for one document.
///
/// When content is absent the engine falls back to its own bundled
/// style or locale of that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSelection {
    pub style: String,
    pub style_content: Option<String>,
    pub locale: String,
    pub locale_content: Option<String>,
}

impl StyleSelection {
    /// A selection that only names a style and locale.
    pub fn named(style: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            style_content: None,
            locale: locale.into(),
            locale_content: None,
        }
    }
}

/// Decode a catalog file, as YAML for `.yaml`/`.yml` and JSON otherwise.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::InvalidCatalog {
        message: format!("failed to read '{}': {}", path.display(), e),
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let decoded: std::result::Result<T, String> = if is_yaml {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    };
    decoded.map_err(|message| Error::InvalidCatalog {
        message: format!("'{}': {}", path.display(), message),
    })
}
