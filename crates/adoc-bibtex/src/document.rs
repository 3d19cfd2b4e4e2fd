/*
 * document.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * A line-oriented AsciiDoc document host.
 */

//! Line-based view of an AsciiDoc document.
//!
//! Only the structure citation processing cares about is recognized:
//!
//! - attribute entries (`:name: value`, `:name!:`)
//! - `bibliography::<target>[<style>,<locale>]` block macros
//! - line comments and delimited blocks whose content is not prose
//!   (listing, literal, passthrough and comment blocks)
//!
//! Every other line is a prose fragment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use adoc_bibtex_core::config::{ATTR_FILE, ATTR_LOCALE, ATTR_STYLE};
use adoc_bibtex_core::{Attributes, DocumentHost, Rendered};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ATTRIBUTE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(?P<unset>!)?(?P<name>[A-Za-z0-9_][A-Za-z0-9_-]*)(?P<unset_after>!)?:(?:\s+(?P<value>.*))?$")
        .expect("valid attribute entry regex")
});

static BIBLIOGRAPHY_MACRO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^bibliography::(?P<target>[^\[\s]*)\[(?P<attrs>[^\]]*)\]\s*$")
        .expect("valid bibliography macro regex")
});

/// Delimiter characters of blocks whose content is never scanned.
const VERBATIM_DELIMITERS: [char; 4] = ['-', '.', '+', '/'];

fn is_verbatim_delimiter(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 4
        && VERBATIM_DELIMITERS
            .iter()
            .any(|&c| line.chars().all(|ch| ch == c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Prose,
    Bibliography,
    Other,
}

/// An AsciiDoc document held as lines.
#[derive(Debug, Clone)]
pub struct AsciiDocDocument {
    base_dir: PathBuf,
    lines: Vec<String>,
    kinds: Vec<LineKind>,
    attributes: HashMap<String, String>,
    overrides: HashMap<String, String>,
    /// Line index of each prose fragment.
    prose: Vec<usize>,
}

impl AsciiDocDocument {
    /// Parse `source`. `overrides` take precedence over attribute entries.
    pub fn parse(
        source: &str,
        base_dir: impl Into<PathBuf>,
        overrides: HashMap<String, String>,
    ) -> Self {
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        let mut document = Self {
            base_dir: base_dir.into(),
            kinds: Vec::with_capacity(lines.len()),
            lines: Vec::new(),
            attributes: HashMap::new(),
            overrides,
            prose: Vec::new(),
        };

        let mut open_block: Option<String> = None;
        for (index, line) in lines.iter().enumerate() {
            let kind = if open_block.is_some() {
                if open_block.as_deref() == Some(line.trim_end()) {
                    open_block = None;
                }
                LineKind::Other
            } else {
                document.classify(line, &mut open_block)
            };
            if kind == LineKind::Prose {
                document.prose.push(index);
            }
            document.kinds.push(kind);
        }
        document.lines = lines;
        debug!(
            lines = document.lines.len(),
            fragments = document.prose.len(),
            placeholders = document.bibliography_placeholders(),
            "Parsed document"
        );
        document
    }

    fn classify(&mut self, line: &str, open_block: &mut Option<String>) -> LineKind {
        if is_verbatim_delimiter(line) {
            *open_block = Some(line.trim_end().to_string());
            return LineKind::Other;
        }
        if line.starts_with("//") {
            return LineKind::Other;
        }
        if let Some(caps) = ATTRIBUTE_ENTRY.captures(line) {
            let name = caps["name"].to_string();
            if caps.name("unset").is_some() || caps.name("unset_after").is_some() {
                self.attributes.remove(&name);
            } else {
                let value = caps.name("value").map_or("", |m| m.as_str().trim());
                self.attributes.insert(name, value.to_string());
            }
            return LineKind::Other;
        }
        if let Some(caps) = BIBLIOGRAPHY_MACRO.captures(line) {
            self.apply_bibliography_macro(&caps["target"], &caps["attrs"]);
            return LineKind::Bibliography;
        }
        LineKind::Prose
    }

    /// Settings from a bibliography macro only fill attributes that are unset.
    fn apply_bibliography_macro(&mut self, target: &str, attrs: &str) {
        let mut style = None;
        let mut locale = None;
        let mut positional = 0;
        for attr in attrs.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            match attr.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim().trim_matches('"').to_string();
                    match name.trim() {
                        "style" => style = Some(value),
                        "locale" => locale = Some(value),
                        _ => {}
                    }
                }
                None => {
                    match positional {
                        0 => style = Some(attr.to_string()),
                        1 => locale = Some(attr.to_string()),
                        _ => {}
                    }
                    positional += 1;
                }
            }
        }

        if !target.is_empty() {
            self.set_if_unset(ATTR_FILE, target.to_string());
        }
        if let Some(style) = style {
            self.set_if_unset(ATTR_STYLE, style);
        }
        if let Some(locale) = locale {
            self.set_if_unset(ATTR_LOCALE, locale);
        }
    }

    fn set_if_unset(&mut self, name: &str, value: String) {
        if self.attribute(name).is_none() {
            self.attributes.insert(name.to_string(), value);
        }
    }

    /// The document text, with bibliography placeholders that were never
    /// filled left in place.
    pub fn to_source(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

impl Attributes for AsciiDocDocument {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.overrides
            .get(name)
            .or_else(|| self.attributes.get(name))
            .map(String::as_str)
    }
}

impl DocumentHost for AsciiDocDocument {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn fragments(&self) -> Vec<String> {
        self.prose.iter().map(|&i| self.lines[i].clone()).collect()
    }

    fn replace_fragment(&mut self, index: usize, text: String) {
        if let Some(&line) = self.prose.get(index) {
            self.lines[line] = text;
        }
    }

    fn bibliography_placeholders(&self) -> usize {
        self.kinds
            .iter()
            .filter(|&&kind| kind == LineKind::Bibliography)
            .count()
    }

    fn inject_bibliography(&mut self, entries: &[Rendered]) {
        let list = entries
            .iter()
            .map(|entry| format!("* {}", entry.to_asciidoc()))
            .collect::<Vec<_>>()
            .join("\n");
        for (line, kind) in self.lines.iter_mut().zip(&self.kinds) {
            if *kind == LineKind::Bibliography {
                line.clone_from(&list);
            }
        }
    }
}
