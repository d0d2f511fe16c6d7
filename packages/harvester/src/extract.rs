//! Per-entry data extraction.
//!
//! Builds one [`Entry`] from an entry element: Atom leaf fields through the
//! field resolver, the technical document URI through a fixed chain of hops,
//! and the derived party/classification fields by aggregating repeated
//! containers.

use roxmltree::Node;

use crate::namespace::NamespaceMap;
use crate::resolver::{resolve_link, resolve_text};
use crate::strategy::{first_match, Matcher, Scope, Strategy};
use crate::types::{Entry, FIELD_SEPARATOR};
use crate::xml::element_text;

/// An element name bound to a namespace prefix of the [`NamespaceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixedName {
    pub prefix: &'static str,
    pub tag: &'static str,
}

impl PrefixedName {
    pub const fn new(prefix: &'static str, tag: &'static str) -> Self {
        Self { prefix, tag }
    }

    /// Lookups for this name: qualified with the mapped URI when the prefix is
    /// known, then by local name in any namespace.
    fn strategies<'n>(&self, namespaces: &'n NamespaceMap, scope: Scope) -> Vec<Strategy<'n>> {
        let mut strategies = Vec::with_capacity(2);
        if let Some(uri) = namespaces.get(self.prefix) {
            strategies.push(Strategy::new("qualified", Matcher::Qualified(uri), scope));
        }
        strategies.push(Strategy::new("local-name", Matcher::LocalName, scope));
        strategies
    }
}

/// Hops from an entry down to the technical document URI.
pub const DOCUMENT_URI_PATH: &[PrefixedName] = &[
    PrefixedName::new("cac-place-ext", "ContractFolderStatus"),
    PrefixedName::new("cac", "TechnicalDocumentReference"),
    PrefixedName::new("cac", "Attachment"),
    PrefixedName::new("cac", "ExternalReference"),
    PrefixedName::new("cbc", "URI"),
];

/// A repeated container and the leaf value read from each occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub container: PrefixedName,
    pub leaf: PrefixedName,
}

pub const PARTY_NAMES: Aggregate = Aggregate {
    container: PrefixedName::new("cac", "PartyName"),
    leaf: PrefixedName::new("cbc", "Name"),
};

pub const CLASSIFICATION_CODES: Aggregate = Aggregate {
    container: PrefixedName::new("cac", "RequiredCommodityClassification"),
    leaf: PrefixedName::new("cbc", "ItemClassificationCode"),
};

/// Follow [`DOCUMENT_URI_PATH`] from `entry`.
///
/// Returns `None` as soon as a hop is missing; an incomplete chain is a
/// normal outcome for entries without attached documents.
pub fn extract_document_uri(entry: Node<'_, '_>, namespaces: &NamespaceMap) -> Option<String> {
    let mut current = entry;
    for hop in DOCUMENT_URI_PATH {
        let strategies = hop.strategies(namespaces, Scope::Descendants);
        let Some((next, _)) = first_match(&strategies, current, hop.tag) else {
            tracing::debug!(hop = hop.tag, "Document reference chain ends");
            return None;
        };
        current = next;
    }
    element_text(current)
}

/// Collect the leaf values of every `aggregate` container below `entry`.
///
/// Containers in the mapped namespace are searched first. Only when that pass
/// produces no value at all are containers matched by local name alone.
/// Order is preserved and duplicates are kept.
pub fn collect_values(
    entry: Node<'_, '_>,
    namespaces: &NamespaceMap,
    aggregate: &Aggregate,
) -> Vec<String> {
    let leaf_strategies = aggregate.leaf.strategies(namespaces, Scope::Children);
    let container = aggregate.container.tag;

    if let Some(uri) = namespaces.get(aggregate.container.prefix) {
        let qualified = Matcher::Qualified(uri);
        let values = read_leaves(
            entry.descendants().filter(|n| qualified.matches(*n, container)),
            aggregate.leaf.tag,
            &leaf_strategies,
        );
        if !values.is_empty() {
            return values;
        }
    }

    read_leaves(
        entry
            .descendants()
            .filter(|n| Matcher::LocalName.matches(*n, container)),
        aggregate.leaf.tag,
        &leaf_strategies,
    )
}

fn read_leaves<'a, 'input: 'a>(
    containers: impl Iterator<Item = Node<'a, 'input>>,
    leaf: &str,
    strategies: &[Strategy<'_>],
) -> Vec<String> {
    containers
        .filter_map(|c| first_match(strategies, c, leaf))
        .filter_map(|(node, _)| element_text(node))
        .collect()
}

/// Join aggregated values, `None` when there are none.
pub fn join_values(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(FIELD_SEPARATOR))
    }
}

/// Build an [`Entry`] from an entry element.
///
/// Returns `None` when every field comes out absent or blank.
pub fn extract_entry(entry: Node<'_, '_>, namespaces: &NamespaceMap) -> Option<Entry> {
    let data = Entry {
        id: resolve_text(entry, "id"),
        title: resolve_text(entry, "title"),
        summary: resolve_text(entry, "summary"),
        updated: resolve_text(entry, "updated"),
        link: resolve_link(entry),
        document_uri: extract_document_uri(entry, namespaces),
        party_names: join_values(&collect_values(entry, namespaces, &PARTY_NAMES)),
        classification_codes: join_values(&collect_values(
            entry,
            namespaces,
            &CLASSIFICATION_CODES,
        )),
    };

    if data.is_empty() {
        tracing::debug!("Discarding entry without data");
        return None;
    }

    tracing::debug!(
        id = data.display_id(),
        has_document = data.document_uri.is_some(),
        "Extracted entry"
    );
    Some(data)
}
