//! Tests for the hayagriva-backed engine.
//!
//! Exact CSL output depends on the bundled styles, so these tests check
//! structure and ordering rather than full strings.

use adoc_bibtex_core::{BibliographicEntry, Catalog, CitationStyleEngine, StyleSelection};
use adoc_bibtex_csl::HayagrivaEngine;
use pretty_assertions::assert_eq;

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

@book{abelson85,
  author = {Abelson, Harold and Sussman, Gerald Jay},
  title = {Structure and Interpretation of Computer Programs},
  publisher = {MIT Press},
  year = {1985},
}
";

fn entries() -> Vec<adoc_bibtex_csl::CslEntry> {
    HayagrivaEngine.parse(LIBRARY).unwrap()
}

#[test]
fn test_parse_in_source_order() {
    let ids: Vec<String> = entries().iter().map(|e| e.id().to_string()).collect();
    assert_eq!(ids, vec!["knuth84", "dijkstra68", "abelson85"]);
}

#[test]
fn test_parse_error() {
    let err = HayagrivaEngine.parse("@book{broken, title = {Unclosed").unwrap_err();
    assert!(
        err.to_string().contains("failed to parse bibliography"),
        "Got: {}",
        err
    );
}

#[test]
fn test_render_keeps_requested_order() {
    let all = entries();
    let requested = vec![all[1].clone(), all[2].clone(), all[0].clone()];
    let selection = Catalog::default().select("apa", "en-US");

    let rendered = HayagrivaEngine.render(&requested, &selection).unwrap();

    assert_eq!(rendered.len(), 3);
    assert!(rendered[0].contains("Go To Statement"), "Got: {:?}", rendered);
    assert!(rendered[1].contains("Structure and Interpretation"), "Got: {:?}", rendered);
    assert!(rendered[2].contains("Literate Programming"), "Got: {:?}", rendered);
}

#[test]
fn test_render_single_entry_ieee() {
    let all = entries();
    let selection = StyleSelection::named("ieee", "en-US");
    let rendered = HayagrivaEngine.render(&all[..1], &selection).unwrap();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("Knuth"), "Got: {:?}", rendered);
}

#[test]
fn test_render_placeholder_uses_key_as_title() {
    let placeholder = HayagrivaEngine.placeholder("ghost2024");
    assert_eq!(placeholder.id(), "ghost2024");
    let selection = StyleSelection::named("ieee", "en-US");
    let rendered = HayagrivaEngine.render(&[placeholder], &selection).unwrap();
    assert!(rendered[0].contains("ghost2024"), "Got: {:?}", rendered);
}

#[test]
fn test_render_unknown_style() {
    let selection = StyleSelection::named("no-such-style", "en-US");
    let err = HayagrivaEngine.render(&entries(), &selection).unwrap_err();
    assert!(err.to_string().contains("no-such-style"));
}

#[test]
fn test_render_nothing() {
    let selection = StyleSelection::named("no-such-style", "en-US");
    assert!(HayagrivaEngine.render(&[], &selection).unwrap().is_empty());
}

#[test]
fn test_parse_keeps_repeated_keys() {
    let parsed = HayagrivaEngine
        .parse(
            r"@book{a, author = {Old, Ann}, title = {Old Title}, year = {2000}}
              @book{b, author = {Other, Bo}, title = {Other Title}, year = {2001}}
              @book{a, author = {New, Ann}, title = {New Title}, year = {2002}}",
        )
        .unwrap();

    let summary: Vec<(String, Vec<String>)> = parsed
        .iter()
        .map(|e| (e.id().to_string(), e.author_family_names()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("a".to_string(), vec!["Old".to_string()]),
            ("b".to_string(), vec!["Other".to_string()]),
            ("a".to_string(), vec!["New".to_string()]),
        ]
    );
}

#[test]
fn test_repeated_key_last_definition_wins_with_warning() {
    use adoc_bibtex_core::database::BibliographyDatabase;
    use adoc_bibtex_core::diagnostics::codes;
    use adoc_bibtex_core::{DiagnosticKind, Diagnostics};

    let parsed = HayagrivaEngine
        .parse(
            r"@book{a, title = {Old}, year = {2000}}
              @book{a, title = {New}, year = {2002}}",
        )
        .unwrap();
    let mut diagnostics = Diagnostics::new();
    let database = BibliographyDatabase::from_entries(parsed, &mut diagnostics);

    assert_eq!(database.len(), 1);
    assert_eq!(
        database.get("a").and_then(|e| e.title()),
        Some("New".to_string())
    );
    let messages = diagnostics.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, DiagnosticKind::Warning);
    assert_eq!(messages[0].code, codes::DUPLICATE_ENTRY);
}

const CITATION_ONLY_STYLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
  <info>
    <title>Citations only</title>
    <id>citations-only</id>
    <updated>2024-01-01T00:00:00+00:00</updated>
  </info>
  <citation>
    <layout>
      <text variable="title"/>
    </layout>
  </citation>
</style>
"#;

#[test]
fn test_render_style_without_bibliography_layout() {
    let selection = StyleSelection {
        style_content: Some(CITATION_ONLY_STYLE.to_string()),
        ..StyleSelection::named("citations-only", "en-US")
    };
    let err = HayagrivaEngine
        .render(&entries()[..1], &selection)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Citation style engine error: style 'citations-only' has no bibliography layout"
    );
}
