/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendered replacement text.

use std::fmt;

/// Text produced for a macro or a bibliography line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// AsciiDoc markup, subject to the host's normal substitutions.
    Text(String),
    /// Raw backend markup (LaTeX commands) that must not be escaped.
    Passthrough(String),
}

impl Rendered {
    /// The content without passthrough markers.
    pub fn content(&self) -> &str {
        match self {
            Rendered::Text(text) | Rendered::Passthrough(text) => text,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Rendered::Passthrough(_))
    }

    /// AsciiDoc source for this value; passthrough content is fenced in `+++`.
    pub fn to_asciidoc(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Text(text) => f.write_str(text),
            Rendered::Passthrough(raw) => write!(f, "+++{}+++", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asciidoc_form() {
        let text = Rendered::Text("[.citation]#[1]#".to_string());
        let raw = Rendered::Passthrough(r"\cite{bibliography_entry_a}".to_string());
        assert_eq!(text.to_asciidoc(), "[.citation]#[1]#");
        assert_eq!(raw.to_asciidoc(), r"+++\cite{bibliography_entry_a}+++");
        assert_eq!(raw.content(), r"\cite{bibliography_entry_a}");
        assert!(raw.is_passthrough());
        assert!(!text.is_passthrough());
    }
}
