/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Detection of citation macros in a line of text.
 */

//! Citation macro scanner.
//!
//! Recognized macros:
//!
//! ```text
//! bibitem:<pretext>[<key>]
//! cite:<pretext>[<item>(,<item>)*]
//! citenp:<pretext>[<item>(,<item>)*]
//! ```
//!
//! where `<pretext>` is any run of characters other than whitespace and `[`,
//! and `<item>` is `<id>` or `<id>(<qualifier>)`.
//!
//! Scanning happens in two stages: a regex locates the keyword, pretext and
//! bracketed key list, then [`parse_key_item`] splits each item into its id
//! and qualifier. Items whose parentheses do not balance are dropped rather
//! than failing the whole macro.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MACRO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<kind>bibitem|cite|citenp):(?P<pretext>[^\[\s]*)\[(?P<keys>[^\]]+)\]")
        .expect("valid citation macro regex")
});

/// Which macro was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// `bibitem:[key]`: the full bibliography entry inline.
    Bibitem,
    /// `cite:[keys]`: a parenthetical citation.
    Cite,
    /// `citenp:[keys]`: a citation without parentheses.
    Citenp,
}

impl MacroKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bibitem" => Some(MacroKind::Bibitem),
            "cite" => Some(MacroKind::Cite),
            "citenp" => Some(MacroKind::Citenp),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            MacroKind::Bibitem => "bibitem",
            MacroKind::Cite => "cite",
            MacroKind::Citenp => "citenp",
        }
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One cited key, optionally with a locator such as a page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyItem {
    pub id: String,
    pub qualifier: Option<String>,
}

/// A macro found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroMatch {
    pub kind: MacroKind,
    pub pretext: String,
    /// The text between the brackets, untouched.
    pub raw_keys: String,
    /// Well-formed key items. Empty for `bibitem`, which takes the raw key.
    pub items: Vec<KeyItem>,
    /// Byte range of the whole macro in the scanned line.
    pub range: Range<usize>,
}

impl MacroMatch {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let kind = MacroKind::from_keyword(caps.name("kind")?.as_str())?;
        let raw_keys = caps.name("keys")?.as_str().to_string();
        let items = match kind {
            MacroKind::Bibitem => Vec::new(),
            MacroKind::Cite | MacroKind::Citenp => parse_key_list(&raw_keys),
        };
        Some(Self {
            kind,
            pretext: caps
                .name("pretext")
                .map_or_else(String::new, |m| m.as_str().to_string()),
            raw_keys,
            items,
            range: whole.range(),
        })
    }

    /// The key of a `bibitem` macro.
    pub fn bibitem_key(&self) -> &str {
        self.raw_keys.trim()
    }
}

/// Find all macros in `line`, left to right.
pub fn scan(line: &str) -> Vec<MacroMatch> {
    MACRO_RE
        .captures_iter(line)
        .filter_map(|caps| MacroMatch::from_captures(&caps))
        .collect()
}

/// Whether `line` contains at least one macro.
pub fn has_macros(line: &str) -> bool {
    MACRO_RE.is_match(line)
}

/// Replace every macro in `line` with the text produced by `render`.
///
/// Text between macros is copied unchanged. The first error from `render`
/// aborts the replacement.
pub fn replace_macros<F, E>(line: &str, mut render: F) -> Result<String, E>
where
    F: FnMut(&MacroMatch) -> Result<String, E>,
{
    let mut out = String::with_capacity(line.len());
    let mut last_end = 0;
    for found in scan(line) {
        out.push_str(&line[last_end..found.range.start]);
        out.push_str(&render(&found)?);
        last_end = found.range.end;
    }
    out.push_str(&line[last_end..]);
    Ok(out)
}

/// Split a comma separated key list, dropping malformed items.
pub fn parse_key_list(raw: &str) -> Vec<KeyItem> {
    raw.split(',').filter_map(parse_key_item).collect()
}

/// Parse `id` or `id(qualifier)`.
///
/// Returns `None` for an empty id, stray or nested parentheses, text after
/// the closing parenthesis, or an id containing `[`. An empty qualifier
/// `id()` counts as no qualifier.
pub fn parse_key_item(item: &str) -> Option<KeyItem> {
    let item = item.trim();
    if item.contains('[') {
        return None;
    }
    let Some(open) = item.find('(') else {
        if item.is_empty() || item.contains(')') {
            return None;
        }
        return Some(KeyItem {
            id: item.to_string(),
            qualifier: None,
        });
    };

    let id = item[..open].trim();
    let qualifier = item[open + 1..].strip_suffix(')')?;
    if id.is_empty() || id.contains(')') || qualifier.contains(['(', ')']) {
        return None;
    }
    Some(KeyItem {
        id: id.to_string(),
        qualifier: Some(qualifier.to_string()).filter(|q| !q.is_empty()),
    })
}
