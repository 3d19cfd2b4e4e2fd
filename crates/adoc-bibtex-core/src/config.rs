/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendering configuration read from document attributes.
 */

//! Rendering configuration.
//!
//! A [`RenderConfig`] is fixed for one document pass. It is normally built
//! from document attributes with [`RenderConfig::from_attributes`]; every
//! field has a default so an empty attribute set is valid.
//!
//! | Attribute                  | Field              | Default     |
//! |----------------------------|--------------------|-------------|
//! | `bibtex-style`             | `style`            | `ieee`      |
//! | `bibtex-locale`            | `locale`           | `en-US`     |
//! | `bibtex-order`             | `order`            | sorted      |
//! | `bibtex-format`            | `format`           | `asciidoc`  |
//! | `bibtex-throw`             | `throw_on_unknown` | `false`     |
//! | `bibtex-citation-template` | `template`         | `[$id]`     |
//! | `bibtex-links`             | `links`            | `true`      |

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

pub const ATTR_FILE: &str = "bibtex-file";
pub const ATTR_STYLE: &str = "bibtex-style";
pub const ATTR_LOCALE: &str = "bibtex-locale";
pub const ATTR_ORDER: &str = "bibtex-order";
pub const ATTR_FORMAT: &str = "bibtex-format";
pub const ATTR_THROW: &str = "bibtex-throw";
pub const ATTR_CITATION_TEMPLATE: &str = "bibtex-citation-template";
pub const ATTR_LINKS: &str = "bibtex-links";

pub const DEFAULT_STYLE: &str = "ieee";
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_CITATION_TEMPLATE: &str = "[$id]";

static CITATION_TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\$id(.+)$").expect("valid citation template regex"));

/// Output the document is ultimately converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Citations and bibliography rendered through the citation style engine.
    #[default]
    Asciidoc,
    /// Raw `\cite` commands for a LaTeX toolchain.
    Latex,
    /// Same as [`OutputFormat::Latex`]; kept as a separate spelling.
    Bibtex,
    /// `\parencite`/`\textcite` commands and `\printbibliography`.
    Biblatex,
}

impl OutputFormat {
    /// Whether citations are emitted as LaTeX commands instead of styled text.
    pub fn is_latex_family(self) -> bool {
        match self {
            OutputFormat::Asciidoc => false,
            OutputFormat::Latex | OutputFormat::Bibtex | OutputFormat::Biblatex => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Asciidoc => "asciidoc",
            OutputFormat::Latex => "latex",
            OutputFormat::Bibtex => "bibtex",
            OutputFormat::Biblatex => "biblatex",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized output format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bibliography output format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asciidoc" => Ok(OutputFormat::Asciidoc),
            "latex" => Ok(OutputFormat::Latex),
            "bibtex" => Ok(OutputFormat::Bibtex),
            "biblatex" => Ok(OutputFormat::Biblatex),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// How the registry is ordered before numeric labels are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationOrder {
    /// Keep first-appearance order.
    Appearance,
    /// Sort by author, then date.
    #[default]
    Sorted,
}

impl CitationOrder {
    /// Only the literal `appearance` selects appearance order.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("appearance") => CitationOrder::Appearance,
            _ => CitationOrder::Sorted,
        }
    }
}

/// Opening and closing text placed around citation labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationTemplate {
    pub open: String,
    pub close: String,
}

impl CitationTemplate {
    /// Split a template such as `[$id]` or `($id)` around its `$id` placeholder.
    ///
    /// Both sides must be non-empty; anything else yields the default `[`/`]`.
    pub fn parse(template: &str) -> Self {
        match CITATION_TEMPLATE_RE.captures(template) {
            Some(caps) => Self {
                open: caps[1].to_string(),
                close: caps[2].to_string(),
            },
            None => Self::default(),
        }
    }

    pub fn wrap(&self, label: &str) -> String {
        format!("{}{}{}", self.open, label, self.close)
    }
}

impl Default for CitationTemplate {
    fn default() -> Self {
        Self {
            open: "[".to_string(),
            close: "]".to_string(),
        }
    }
}

/// Read access to document attributes.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl<S: std::hash::BuildHasher> Attributes for std::collections::HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Attributes for indexmap::IndexMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Configuration for one document pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub style: String,
    pub locale: String,
    /// Wrap inline labels in cross references to `bibliography_entry_<key>`.
    pub links: bool,
    pub order: CitationOrder,
    pub format: OutputFormat,
    /// Make unknown citation keys fatal instead of rendering a fallback.
    pub throw_on_unknown: bool,
    pub template: CitationTemplate,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            links: false,
            order: CitationOrder::default(),
            format: OutputFormat::default(),
            throw_on_unknown: false,
            template: CitationTemplate::default(),
        }
    }
}

impl RenderConfig {
    /// Build the configuration from document attributes.
    ///
    /// Citations produced for a document link to their bibliography entry
    /// unless `bibtex-links` is `false`. An unknown `bibtex-format` is
    /// reported and treated as `asciidoc`.
    pub fn from_attributes(attributes: &impl Attributes) -> Self {
        let non_empty = |name: &str| attributes.attribute(name).filter(|v| !v.is_empty());

        let format = match non_empty(ATTR_FORMAT) {
            None => OutputFormat::default(),
            Some(value) => value.parse().unwrap_or_else(|err: UnknownFormat| {
                tracing::warn!("{}, falling back to asciidoc", err);
                OutputFormat::default()
            }),
        };

        Self {
            style: non_empty(ATTR_STYLE).unwrap_or(DEFAULT_STYLE).to_string(),
            locale: non_empty(ATTR_LOCALE).unwrap_or(DEFAULT_LOCALE).to_string(),
            links: attributes.attribute(ATTR_LINKS) != Some("false"),
            order: CitationOrder::from_attribute(attributes.attribute(ATTR_ORDER)),
            format,
            throw_on_unknown: attributes.attribute(ATTR_THROW) == Some("true"),
            template: CitationTemplate::parse(
                non_empty(ATTR_CITATION_TEMPLATE).unwrap_or(DEFAULT_CITATION_TEMPLATE),
            ),
        }
    }
}
