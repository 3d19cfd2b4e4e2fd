/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Parsing BibLaTeX sources that may define a key more than once.
 */

//! hayagriva refuses a source in which an entry key repeats. The source is
//! split into top-level `@` blocks and entries are grouped into generations:
//! the n-th definition of every key goes to generation n. Each generation is
//! parsed together with the `@string`, `@preamble` and `@comment` blocks, and
//! the entries are returned in source order with every definition kept.

use std::collections::HashMap;

use adoc_bibtex_core::{Error, Result};
use hayagriva::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    pub text: &'a str,
    /// Entry key, `None` for `@string`, `@preamble` and `@comment`.
    pub key: Option<&'a str>,
}

/// Split `source` into its top-level `@type{...}` or `@type(...)` blocks.
///
/// Text outside blocks is ignored, as BibTeX does. An unterminated block
/// runs to the end of the source so the parser can report it.
pub(crate) fn split_blocks(source: &str) -> Vec<Block<'_>> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(offset) = source[pos..].find('@') {
        let start = pos + offset;
        let Some(open_offset) = source[start..].find(['{', '(']) else {
            break;
        };
        let open = start + open_offset;
        let kind = source[start + 1..open].trim().to_ascii_lowercase();
        let close_char = if bytes[open] == b'{' { b'}' } else { b')' };

        let mut depth = 0usize;
        let mut end = source.len();
        for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
            match b {
                b'{' => depth += 1,
                b'}' if depth > 0 => depth -= 1,
                _ if b == close_char && depth == 0 => {
                    end = i + 1;
                    break;
                }
                _ => {}
            }
        }

        let text = &source[start..end];
        let key = match kind.as_str() {
            "string" | "preamble" | "comment" => None,
            _ => {
                let body = &source[open + 1..end.saturating_sub(1).max(open + 1)];
                Some(body.split(',').next().unwrap_or_default().trim())
            }
        };
        blocks.push(Block { text, key });
        pos = end;
    }
    blocks
}

/// Parse `source`, keeping every definition of a repeated key.
pub(crate) fn parse_entries(source: &str) -> Result<Vec<Entry>> {
    let blocks = split_blocks(source);

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let generation: Vec<Option<usize>> = blocks
        .iter()
        .map(|block| {
            block.key.map(|key| {
                let count = seen.entry(key).or_default();
                *count += 1;
                *count - 1
            })
        })
        .collect();
    let generations = seen.values().copied().max().unwrap_or(0);

    if generations <= 1 {
        return parse_library(source);
    }

    let mut positioned: Vec<(usize, Entry)> = Vec::new();
    for current in 0..generations {
        let mut text = String::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (index, block) in blocks.iter().enumerate() {
            match (block.key, generation[index]) {
                (None, _) => {}
                (Some(key), Some(g)) if g == current => {
                    positions.insert(key, index);
                }
                _ => continue,
            }
            text.push_str(block.text);
            text.push('\n');
        }
        for entry in parse_library(&text)? {
            let index = positions.get(entry.key()).copied().unwrap_or(usize::MAX);
            positioned.push((index, entry));
        }
    }
    positioned.sort_by_key(|(index, _)| *index);
    Ok(positioned.into_iter().map(|(_, entry)| entry).collect())
}

fn parse_library(source: &str) -> Result<Vec<Entry>> {
    let library = hayagriva::io::from_biblatex_str(source).map_err(|errors| {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Error::style_engine(format!("failed to parse bibliography: {}", joined))
    })?;
    Ok(library.iter().cloned().collect())
}
