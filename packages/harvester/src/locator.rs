//! Entry location within a feed document.

use roxmltree::Node;

use crate::config::ATOM_NS;
use crate::strategy::{first_non_empty, Matcher, Scope, Strategy};

/// Local name of feed entries.
pub const ENTRY_TAG: &str = "entry";

/// Entry lookups in evaluation order. The last one is strictly broader than
/// the others and catches feeds that use an unexpected URI for the Atom
/// vocabulary, as well as documents whose root is itself an entry.
pub const ENTRY_STRATEGIES: &[Strategy<'static>] = &[
    Strategy::new("unqualified child", Matcher::Unqualified, Scope::Children),
    Strategy::new("unqualified descendant", Matcher::Unqualified, Scope::Descendants),
    Strategy::new("atom child", Matcher::Qualified(ATOM_NS), Scope::Children),
    Strategy::new("atom descendant", Matcher::Qualified(ATOM_NS), Scope::Descendants),
    Strategy::new("local-name scan", Matcher::LocalName, Scope::Subtree),
];

/// Find the entry elements below `root`, in document order.
///
/// An empty result is a normal outcome for feeds without entries.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use placsp_harvester::locator::locate_entries;
///
/// let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry/><entry/></feed>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(locate_entries(doc.root_element()).len(), 2);
/// ```
pub fn locate_entries<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    match first_non_empty(ENTRY_STRATEGIES, root, ENTRY_TAG) {
        Some((entries, strategy)) => {
            tracing::debug!(
                strategy = strategy.name,
                count = entries.len(),
                "Located entries"
            );
            entries
        }
        None => Vec::new(),
    }
}
