/*
 * test_support.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A deterministic engine for unit tests.
//!
//! Sources are one entry per line: `id | Family;Family | editor | 2020-5-1 | Title`.
//! Rendering produces `Family, Family. Title` (or just the title).

use crate::catalog::StyleSelection;
use crate::engine::{BibliographicEntry, CitationStyleEngine};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeEntry {
    pub id: String,
    pub authors: Vec<String>,
    pub editor: Option<String>,
    pub date: Vec<i32>,
    pub title: String,
}

impl BibliographicEntry for FakeEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn author_family_names(&self) -> Vec<String> {
        self.authors.clone()
    }

    fn editor(&self) -> Option<String> {
        self.editor.clone()
    }

    fn issued_date_parts(&self) -> Vec<i32> {
        self.date.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeEngine;

impl CitationStyleEngine for FakeEngine {
    type Entry = FakeEntry;

    fn parse(&self, source: &str) -> Result<Vec<FakeEntry>> {
        source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(parse_line)
            .collect()
    }

    fn placeholder(&self, key: &str) -> FakeEntry {
        FakeEntry {
            id: key.to_string(),
            authors: Vec::new(),
            editor: None,
            date: Vec::new(),
            title: key.to_string(),
        }
    }

    fn render(&self, entries: &[FakeEntry], selection: &StyleSelection) -> Result<Vec<String>> {
        if selection.style == "broken" {
            return Err(Error::style_engine("style 'broken' not found"));
        }
        Ok(entries
            .iter()
            .map(|entry| {
                if entry.authors.is_empty() {
                    entry.title.clone()
                } else {
                    format!("{}. {}", entry.authors.join(", "), entry.title)
                }
            })
            .collect())
    }
}

fn parse_line(line: &str) -> Result<FakeEntry> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [id, authors, editor, date, title] = fields.as_slice() else {
        return Err(Error::style_engine(format!("malformed entry: {}", line)));
    };
    Ok(FakeEntry {
        id: id.to_string(),
        authors: authors
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect(),
        editor: Some(editor.to_string()).filter(|e| !e.is_empty()),
        date: date
            .split('-')
            .filter_map(|part| part.trim().parse().ok())
            .collect(),
        title: title.to_string(),
    })
}
