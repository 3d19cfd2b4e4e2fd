//! adoc-bibtex CLI - Main entry point

use std::path::PathBuf;

use adoc_bibtex::render::{self, RenderArgs};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "adoc-bibtex")]
#[command(version)]
#[command(about = "Resolve BibTeX citations in an AsciiDoc document", long_about = None)]
struct Cli {
    /// Input AsciiDoc file
    input: PathBuf,

    /// Write output to FILE (use '--output -' for stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Document attribute override (NAME=VALUE), e.g. bibtex-style=apa
    #[arg(short = 'a', long = "attribute")]
    attributes: Vec<String>,

    /// Style catalog file (JSON or YAML)
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Locale catalog file (JSON or YAML)
    #[arg(long)]
    locales: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adoc_bibtex=info,adoc_bibtex_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    render::execute(RenderArgs {
        input: cli.input,
        output: cli.output,
        attributes: cli.attributes,
        styles: cli.styles,
        locales: cli.locales,
    })
}
