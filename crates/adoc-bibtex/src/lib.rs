//! Resolve citations and render bibliographies in AsciiDoc documents.
//!
//! The `adoc-bibtex` binary is a thin wrapper around [`render::execute`].
//! [`document::AsciiDocDocument`] is the line-based document host it uses.

pub mod document;
pub mod render;

pub use document::AsciiDocDocument;
pub use render::{RenderArgs, execute, render_source};
