//! End-to-end extraction tests over feed fixtures.
//!
//! The three fixtures carry the same two tenders (plus one empty entry),
//! written with a default Atom namespace, with an explicit `atom:` prefix and
//! without any namespace declarations.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use roxmltree::Document;

use placsp_harvester::feed::{parse_feed, parse_feed_file};
use placsp_harvester::locator::locate_entries;
use placsp_harvester::namespace::resolve_namespaces;
use placsp_harvester::types::Entry;

const FIXTURES: &[&str] = &["default_namespace.atom", "prefixed.atom", "no_namespace.atom"];

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn expected_entries() -> Vec<Entry> {
    vec![
        Entry {
            id: Some(
                "https://contrataciondelestado.es/sindicacion/licitacionesPerfilContratante/1001"
                    .to_string(),
            ),
            title: Some("Servicio de limpieza de edificios municipales".to_string()),
            summary: Some(
                "Id licitación: 2024/001; Órgano de Contratación: Ayuntamiento de Ejemplo; Importe: 120000 EUR"
                    .to_string(),
            ),
            updated: Some("2024-05-02T09:15:00.120+02:00".to_string()),
            link: Some(
                "https://contrataciondelestado.es/wps/poc?uri=deeplink:detalle_licitacion&idEvl=1001"
                    .to_string(),
            ),
            document_uri: Some("https://x/doc.pdf".to_string()),
            party_names: Some("Ayuntamiento de Ejemplo | Limpiezas Acme SL".to_string()),
            classification_codes: Some("90910000 | 90911200".to_string()),
        },
        Entry {
            id: Some(
                "https://contrataciondelestado.es/sindicacion/licitacionesPerfilContratante/1002"
                    .to_string(),
            ),
            title: Some("Suministro de mobiliario escolar".to_string()),
            summary: Some(
                "Id licitación: 2024/002; Órgano de Contratación: Consejería de Educación"
                    .to_string(),
            ),
            updated: Some("2024-05-01T12:00:00.000+02:00".to_string()),
            link: Some(
                "https://contrataciondelestado.es/wps/poc?uri=deeplink:detalle_licitacion&idEvl=1002"
                    .to_string(),
            ),
            document_uri: None,
            party_names: Some("Consejería de Educación".to_string()),
            classification_codes: Some("39160000".to_string()),
        },
    ]
}

#[test]
fn test_default_namespace_feed() {
    let entries = parse_feed(&load_fixture("default_namespace.atom")).unwrap();
    assert_eq!(entries, expected_entries());
}

#[test]
fn test_prefixed_feed() {
    let entries = parse_feed(&load_fixture("prefixed.atom")).unwrap();
    assert_eq!(entries, expected_entries());
}

#[test]
fn test_feed_without_namespaces() {
    let entries = parse_feed(&load_fixture("no_namespace.atom")).unwrap();
    assert_eq!(entries, expected_entries());
}

#[test]
fn test_all_layouts_locate_same_entries() {
    for name in FIXTURES {
        let xml = load_fixture(name);
        let doc = Document::parse(&xml).unwrap();
        let located = locate_entries(doc.root_element());
        // The empty third entry is located but dropped during extraction
        assert_eq!(located.len(), 3, "{name}");
    }
}

#[test]
fn test_static_prefixes_survive_detection() {
    for name in FIXTURES {
        let xml = load_fixture(name);
        let doc = Document::parse(&xml).unwrap();
        let namespaces = resolve_namespaces(&doc);

        assert_eq!(
            namespaces.get("cac"),
            Some("urn:dgpe:names:draft:codice:schema:xsd:CommonAggregateComponents-2"),
            "{name}"
        );
        assert_eq!(
            namespaces.get("atom"),
            Some("http://www.w3.org/2005/Atom"),
            "{name}"
        );
    }
}

#[test]
fn test_default_prefix_only_for_atom_root() {
    let with_root = Document::parse(&load_fixture("default_namespace.atom"))
        .map(|doc| resolve_namespaces(&doc))
        .unwrap();
    assert_eq!(with_root.default_namespace(), Some("http://www.w3.org/2005/Atom"));

    let bare = Document::parse(&load_fixture("no_namespace.atom"))
        .map(|doc| resolve_namespaces(&doc))
        .unwrap();
    assert_eq!(bare.default_namespace(), None);
}

#[test]
fn test_parse_feed_file_fixture() {
    let entries = parse_feed_file(&fixture_path("prefixed.atom")).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].document_uri, None);
}
