//! Effective prefix→URI mapping for a parsed feed document.
//!
//! Feeds in the wild declare the same vocabularies under different URIs
//! (draft CODICE, UBL, vendor extensions) or not at all. The resolver starts
//! from a static table of well-known prefixes and fills in any prefix the
//! table lacks by recognising URI fragments on the elements actually present.

use std::collections::BTreeMap;

use roxmltree::Document;

use crate::config::{ATOM_NS, KNOWN_NAMESPACES};
use crate::xml::namespace_uri;

/// Prefix under which the feed's default namespace is registered.
pub const DEFAULT_PREFIX: &str = "";

/// A URI fragment and the prefixes it implies.
#[derive(Debug, Clone, Copy)]
pub struct DetectionRule {
    pub fragment: &'static str,
    pub prefixes: &'static [&'static str],
}

/// Detection rules in evaluation order. Only the first matching rule applies to a URI.
pub const DETECTION_RULES: &[DetectionRule] = &[
    DetectionRule {
        fragment: "Atom",
        prefixes: &["atom"],
    },
    DetectionRule {
        fragment: "CommonAggregateComponents",
        prefixes: &["cac"],
    },
    DetectionRule {
        fragment: "CommonBasicComponents",
        prefixes: &["cbc"],
    },
    // Both extension prefixes receive the same URI.
    DetectionRule {
        fragment: "PlaceExtensions",
        prefixes: &["cac-place-ext", "cbc-place-ext"],
    },
];

/// Mapping from prefix to namespace URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: BTreeMap<String, String>,
}

impl NamespaceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the URI registered for `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.entries.contains_key(prefix)
    }

    /// Register `prefix` unless it is already defined.
    ///
    /// Returns `true` if the prefix was added.
    pub fn insert_if_absent(&mut self, prefix: &str, uri: &str) -> bool {
        if self.entries.contains_key(prefix) {
            return false;
        }
        self.entries.insert(prefix.to_string(), uri.to_string());
        true
    }

    /// The URI registered for unprefixed feed elements, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.get(DEFAULT_PREFIX)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (prefix, uri) in iter {
            map.insert_if_absent(prefix, uri);
        }
        map
    }
}

/// Builds a [`NamespaceMap`] for a document.
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    static_table: Vec<(String, String)>,
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new(KNOWN_NAMESPACES.iter().copied())
    }
}

impl NamespaceResolver {
    /// Create a resolver over a custom static table.
    pub fn new<'a>(table: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            static_table: table
                .into_iter()
                .map(|(p, u)| (p.to_string(), u.to_string()))
                .collect(),
        }
    }

    /// Resolve the effective namespaces of `doc`.
    ///
    /// Static entries always win; detection only adds missing prefixes.
    pub fn resolve(&self, doc: &Document<'_>) -> NamespaceMap {
        let mut map: NamespaceMap = self
            .static_table
            .iter()
            .map(|(p, u)| (p.as_str(), u.as_str()))
            .collect();

        for uri in doc.descendants().filter_map(|n| {
            if n.is_element() {
                namespace_uri(n)
            } else {
                None
            }
        }) {
            let Some(rule) = DETECTION_RULES.iter().find(|r| uri.contains(r.fragment)) else {
                continue;
            };
            for prefix in rule.prefixes {
                if map.insert_if_absent(prefix, uri) {
                    tracing::debug!(prefix, uri, "Detected namespace");
                }
            }
        }

        if namespace_uri(doc.root_element()) == Some(ATOM_NS) {
            map.insert_if_absent(DEFAULT_PREFIX, ATOM_NS);
        }

        map
    }
}

/// Resolve namespaces with the well-known static table.
pub fn resolve_namespaces(doc: &Document<'_>) -> NamespaceMap {
    NamespaceResolver::default().resolve(doc)
}
