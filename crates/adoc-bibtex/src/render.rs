/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Processing a single AsciiDoc file.
//!
//! The input is parsed into an [`AsciiDocDocument`], run through
//! [`process_document`] with the hayagriva engine, and written out again.
//! Diagnostics are reported through `tracing` as they are recorded; the
//! command only fails on fatal errors.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use adoc_bibtex_core::{Catalog, LocaleCatalog, Report, StyleCatalog, process_document};
use adoc_bibtex_csl::HayagrivaEngine;
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::document::AsciiDocDocument;

/// Arguments for rendering one file
#[derive(Debug, Default)]
pub struct RenderArgs {
    /// Input AsciiDoc file
    pub input: PathBuf,
    /// Output file; stdout when unset or `-`
    pub output: Option<PathBuf>,
    /// Attribute overrides (`name=value`)
    pub attributes: Vec<String>,
    /// Style catalog (JSON or YAML)
    pub styles: Option<PathBuf>,
    /// Locale catalog (JSON or YAML)
    pub locales: Option<PathBuf>,
}

/// Split a `name=value` override. A bare `name` sets an empty value.
pub fn parse_attribute(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid attribute '{}': expected NAME=VALUE", raw);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Load the optional style and locale catalogs.
pub fn load_catalog(styles: Option<&Path>, locales: Option<&Path>) -> Result<Catalog> {
    let styles = match styles {
        Some(path) => StyleCatalog::from_path(path)
            .with_context(|| format!("Failed to load style catalog {}", path.display()))?,
        None => StyleCatalog::default(),
    };
    let locales = match locales {
        Some(path) => LocaleCatalog::from_path(path)
            .with_context(|| format!("Failed to load locale catalog {}", path.display()))?,
        None => LocaleCatalog::default(),
    };
    Ok(Catalog::new(styles, locales))
}

/// Process `source` and return the rewritten text.
pub fn render_source(
    source: &str,
    base_dir: &Path,
    overrides: HashMap<String, String>,
    catalog: &Catalog,
) -> Result<(String, Report)> {
    let mut document = AsciiDocDocument::parse(source, base_dir, overrides);
    let report = process_document(&mut document, HayagrivaEngine::new(), catalog)
        .context("Citation processing failed")?;
    Ok((document.to_source(), report))
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("Input file does not exist: {}", args.input.display());
    }
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let base_dir = args
        .input
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let overrides = args
        .attributes
        .iter()
        .map(|raw| parse_attribute(raw))
        .collect::<Result<HashMap<_, _>>>()?;
    let catalog = load_catalog(args.styles.as_deref(), args.locales.as_deref())?;

    debug!(input = %args.input.display(), base_dir = %base_dir.display(), "Rendering");
    let (rendered, report) = render_source(&source, &base_dir, overrides, &catalog)?;
    info!(
        outcome = ?report.outcome,
        diagnostics = report.diagnostics.len(),
        "Finished {}",
        args.input.display()
    );

    match args.output.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        _ => std::io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?,
    }
    Ok(())
}
