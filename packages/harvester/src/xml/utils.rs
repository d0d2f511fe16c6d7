//! XML utility functions for navigating namespaced DOM trees.
//!
//! roxmltree resolves prefixes while parsing, so every element carries an
//! expanded name: an optional namespace URI plus a local name. The helpers
//! here compare against that expanded name in the three ways feed lookups
//! need: unqualified (no namespace at all), qualified (exact URI) and
//! local-only (any namespace).

use roxmltree::Node;

/// Get the tag name without namespace.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::xml::local_name;
///
/// let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry/></feed>"#;
/// let doc = Document::parse(xml).unwrap();
/// let entry = doc.root_element().first_element_child().unwrap();
/// assert_eq!(local_name(entry), "entry");
/// ```
pub fn local_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get the namespace URI of an element, if it has one.
pub fn namespace_uri<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.tag_name().namespace()
}

/// Render the qualified name in Clark notation (`{uri}local`).
///
/// Elements without a namespace render as their bare local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::xml::qualified_name;
///
/// let doc = Document::parse(r#"<a:feed xmlns:a="urn:x"/>"#).unwrap();
/// assert_eq!(qualified_name(doc.root_element()), "{urn:x}feed");
///
/// let doc = Document::parse("<feed/>").unwrap();
/// assert_eq!(qualified_name(doc.root_element()), "feed");
/// ```
pub fn qualified_name(node: Node<'_, '_>) -> String {
    match namespace_uri(node) {
        Some(ns) => format!("{{{ns}}}{}", local_name(node)),
        None => local_name(node).to_string(),
    }
}

/// Element named `tag` that carries no namespace.
pub fn is_unqualified(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && namespace_uri(node).is_none() && local_name(node) == tag
}

/// Element named `tag` in namespace `ns`.
pub fn is_qualified(node: Node<'_, '_>, ns: &str, tag: &str) -> bool {
    node.is_element() && namespace_uri(node) == Some(ns) && local_name(node) == tag
}

/// Element named `tag` in any namespace, or none.
pub fn has_local_name(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && local_name(node) == tag
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get all element descendants of a node in document order, excluding the node itself.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::xml::descendant_elements;
///
/// let doc = Document::parse("<a>text<b><c/></b><d/></a>").unwrap();
/// let names: Vec<_> = descendant_elements(doc.root_element())
///     .map(|n| n.tag_name().name())
///     .collect();
/// assert_eq!(names, ["b", "c", "d"]);
/// ```
pub fn descendant_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().skip(1).filter(|child| child.is_element())
}

/// Get the node itself followed by all its element descendants, in document order.
///
/// # Arguments
/// * `node` - Element whose subtree is scanned
///
/// # Returns
/// An iterator starting with `node` when it is an element.
pub fn subtree_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(|child| child.is_element())
}

/// Get the trimmed text content of a node.
///
/// Returns `None` for missing or whitespace-only text so that callers can
/// treat "empty" and "absent" identically.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::xml::element_text;
///
/// let doc = Document::parse("<r><a>  x  </a><b>   </b><c/></r>").unwrap();
/// let mut it = doc.root_element().children();
/// assert_eq!(element_text(it.next().unwrap()), Some("x".to_string()));
/// assert_eq!(element_text(it.next().unwrap()), None);
/// assert_eq!(element_text(it.next().unwrap()), None);
/// ```
pub fn element_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Get a non-blank attribute value from a node.
pub fn non_empty_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const MIXED: &str = r#"<root xmlns:x="urn:x">
        <plain/>
        <x:plain/>
        <x:other>value</x:other>
    </root>"#;

    #[test]
    fn test_local_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(local_name(doc.root_element()), "root");
        assert_eq!(namespace_uri(doc.root_element()), Some("http://example.com"));
    }

    #[test]
    fn test_default_namespace_is_inherited() {
        let xml = r#"<feed xmlns="urn:feed"><entry/></feed>"#;
        let doc = Document::parse(xml).unwrap();
        let entry = doc.root_element().first_element_child().unwrap();
        assert_eq!(namespace_uri(entry), Some("urn:feed"));
        assert_eq!(qualified_name(entry), "{urn:feed}entry");
    }

    #[test]
    fn test_matchers_distinguish_namespaces() {
        let doc = Document::parse(MIXED).unwrap();
        let children: Vec<_> = element_children(doc.root_element()).collect();
        let (plain, x_plain) = (children[0], children[1]);

        assert!(is_unqualified(plain, "plain"));
        assert!(!is_unqualified(x_plain, "plain"));

        assert!(is_qualified(x_plain, "urn:x", "plain"));
        assert!(!is_qualified(plain, "urn:x", "plain"));

        assert!(has_local_name(plain, "plain"));
        assert!(has_local_name(x_plain, "plain"));
        assert!(!has_local_name(x_plain, "other"));
    }

    #[test]
    fn test_matchers_reject_text_nodes() {
        let doc = Document::parse("<r>plain</r>").unwrap();
        let text = doc.root_element().first_child().unwrap();
        assert!(!has_local_name(text, "plain"));
        assert!(!is_unqualified(text, "plain"));
    }

    #[test]
    fn test_element_children_skips_text() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_descendant_elements_excludes_self() {
        let doc = Document::parse("<entry><entry/></entry>").unwrap();
        assert_eq!(descendant_elements(doc.root_element()).count(), 1);
    }

    #[test]
    fn test_subtree_elements_includes_self() {
        let doc = Document::parse("<entry>t<entry/></entry>").unwrap();
        let nodes: Vec<_> = subtree_elements(doc.root_element()).collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], doc.root_element());
    }

    #[test]
    fn test_non_empty_attribute() {
        let doc = Document::parse(r#"<link href="https://x" rel=" "/>"#).unwrap();
        let link = doc.root_element();
        assert_eq!(non_empty_attribute(link, "href"), Some("https://x"));
        assert_eq!(non_empty_attribute(link, "rel"), None);
        assert_eq!(non_empty_attribute(link, "type"), None);
    }
}
