//! Namespace-tolerant resolution of a single logical field.

use roxmltree::Node;

use crate::config::ATOM_NS;
use crate::strategy::{first_match, Matcher, Scope, Strategy};
use crate::xml::{element_text, non_empty_attribute};

/// Field lookups in evaluation order.
pub const FIELD_STRATEGIES: &[Strategy<'static>] = &[
    Strategy::new("unqualified", Matcher::Unqualified, Scope::Nearest),
    Strategy::new("atom", Matcher::Qualified(ATOM_NS), Scope::Nearest),
    Strategy::new("local-name", Matcher::LocalName, Scope::Descendants),
];

/// Resolve `field` to an element below `scope`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::resolver::resolve_field;
///
/// let xml = r#"<entry xmlns:a="http://www.w3.org/2005/Atom"><a:title>T</a:title></entry>"#;
/// let doc = Document::parse(xml).unwrap();
/// let title = resolve_field(doc.root_element(), "title").unwrap();
/// assert_eq!(title.text(), Some("T"));
/// ```
pub fn resolve_field<'a, 'input>(
    scope: Node<'a, 'input>,
    field: &str,
) -> Option<Node<'a, 'input>> {
    first_match(FIELD_STRATEGIES, scope, field).map(|(node, strategy)| {
        tracing::debug!(field, strategy = strategy.name, "Resolved field");
        node
    })
}

/// Resolve `field` and return its trimmed text.
pub fn resolve_text(scope: Node<'_, '_>, field: &str) -> Option<String> {
    resolve_field(scope, field).and_then(element_text)
}

/// Resolve the `link` field, preferring its `href` attribute over text.
pub fn resolve_link(scope: Node<'_, '_>) -> Option<String> {
    let link = resolve_field(scope, "link")?;
    non_empty_attribute(link, "href")
        .map(|href| href.trim().to_string())
        .or_else(|| element_text(link))
}
