//! Integration tests for rendering whole AsciiDoc files.

use std::collections::HashMap;
use std::fs;

use adoc_bibtex::render::{self, RenderArgs, render_source};
use adoc_bibtex_core::diagnostics::codes;
use adoc_bibtex_core::{Catalog, Outcome};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const LIBRARY: &str = r"
@book{knuth84,
  author = {Knuth, Donald E.},
  title = {Literate Programming},
  publisher = {CSLI},
  year = {1984},
}

@article{dijkstra68,
  author = {Dijkstra, Edsger W.},
  title = {Go To Statement Considered Harmful},
  journaltitle = {Communications of the ACM},
  date = {1968-03},
}
";

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("refs.bib"), LIBRARY).unwrap();
    dir
}

#[test]
fn test_biblatex_document() {
    let dir = project();
    let source = "\
= Notes
:bibtex-format: biblatex

See cite:[knuth84, dijkstra68(147)] and citenp:[knuth84].

----
cite:[untouched]
----

bibliography::refs.bib[]
";
    let (output, report) =
        render_source(source, dir.path(), HashMap::new(), &Catalog::default()).unwrap();

    insta::assert_snapshot!(output, @r"
    = Notes
    :bibtex-format: biblatex

    See +++\parencite{bibliography_entry_knuth84},\parencite[p.147]{bibliography_entry_dijkstra68}+++ and +++\textcite{bibliography_entry_knuth84}+++.

    ----
    cite:[untouched]
    ----

    * +++\printbibliography+++
    ");
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_asciidoc_document_sorted() {
    let dir = project();
    let source = "\
:bibtex-file: refs.bib
:bibtex-links: false

Knuth cite:[knuth84] and Dijkstra cite:[dijkstra68, missing].

bibliography::[]
";
    let (output, report) =
        render_source(source, dir.path(), HashMap::new(), &Catalog::default()).unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines[3],
        "Knuth [.citation]#[2]# and Dijkstra [.citation]#[1]; [missing]#."
    );

    let items: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("* ")).collect();
    assert_eq!(items.len(), 3);
    assert!(items[0].contains("Go To Statement"), "Got: {:?}", items);
    assert!(items[1].contains("Literate Programming"), "Got: {:?}", items);
    assert!(items[2].contains("missing"), "Got: {:?}", items);

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, codes::UNKNOWN_REFERENCE);
}

#[test]
fn test_overrides_and_throw() {
    let dir = project();
    let source = "See cite:[nowhere].\n\nbibliography::refs.bib[]\n";
    let overrides = HashMap::from([("bibtex-throw".to_string(), "true".to_string())]);

    let err = render_source(source, dir.path(), overrides, &Catalog::default()).unwrap_err();

    assert_eq!(err.to_string(), "Citation processing failed");
    assert_eq!(
        err.root_cause().to_string(),
        "Unknown bibliography reference: nowhere"
    );
}

#[test]
fn test_missing_bibliography_leaves_document() {
    let dir = tempfile::tempdir().unwrap();
    let source = "See cite:[knuth84].\n\nbibliography::[]\n";

    let (output, report) =
        render_source(source, dir.path(), HashMap::new(), &Catalog::default()).unwrap();

    assert_eq!(output, source);
    assert_eq!(report.outcome, Outcome::Skipped);
    assert_eq!(report.diagnostics[0].code, codes::SKIPPED);
}

#[test]
fn test_execute_writes_output_file() {
    let dir = project();
    let input = dir.path().join("doc.adoc");
    let output = dir.path().join("out.adoc");
    fs::write(&input, "cite:[knuth84]\n\nbibliography::[]\n").unwrap();

    render::execute(RenderArgs {
        input,
        output: Some(output.clone()),
        attributes: vec!["bibtex-format=latex".to_string()],
        ..RenderArgs::default()
    })
    .unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert!(
        written.starts_with(r"+++\cite{bibliography_entry_knuth84}+++"),
        "Got: {}",
        written
    );
    assert!(written.contains(r"* +++\bibliographystyle{ieee}+++"));
}

#[test]
fn test_execute_missing_input() {
    let err = render::execute(RenderArgs {
        input: "/no/such/doc.adoc".into(),
        ..RenderArgs::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("Input file does not exist"));
}

#[test]
fn test_repeated_bibliography_key_warns_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("refs.bib"),
        r"@book{a, author = {Old, Ann}, title = {Old Title}, year = {2000}}
@book{a, author = {New, Ann}, title = {New Title}, year = {2002}}
",
    )
    .unwrap();
    let source = ":bibtex-links: false\n\nSee cite:[a].\n\nbibliography::[]\n";

    let (output, report) =
        render_source(source, dir.path(), HashMap::new(), &Catalog::default()).unwrap();

    assert!(matches!(report.outcome, Outcome::Processed { .. }));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, codes::DUPLICATE_ENTRY);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[2], "See [.citation]#[1]#.");
    let items: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("* ")).collect();
    assert_eq!(items.len(), 1);
    assert!(items[0].contains("New Title"), "Got: {:?}", items);
}
