//! Ordered lookup strategies.
//!
//! Every namespace-tolerant lookup in the crate is an ordered list of
//! [`Strategy`] values evaluated until one produces a result. Keeping the
//! lists as data makes their order visible to tests and to the inspector.

use roxmltree::Node;

use crate::xml::{
    descendant_elements, element_children, has_local_name, is_qualified, is_unqualified,
    subtree_elements,
};

/// How an element's name is compared against the wanted tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher<'n> {
    /// Same local name, no namespace.
    Unqualified,
    /// Same local name in the given namespace.
    Qualified(&'n str),
    /// Same local name, any namespace.
    LocalName,
}

impl Matcher<'_> {
    pub fn matches(&self, node: Node<'_, '_>, tag: &str) -> bool {
        match self {
            Self::Unqualified => is_unqualified(node, tag),
            Self::Qualified(ns) => is_qualified(node, ns, tag),
            Self::LocalName => has_local_name(node, tag),
        }
    }
}

/// Which part of the tree below the anchor is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Immediate element children only.
    Children,
    /// All descendants in document order.
    Descendants,
    /// Immediate children, falling back to deeper descendants.
    Nearest,
    /// The anchor itself and all its descendants.
    Subtree,
}

/// One rule in an ordered fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy<'n> {
    pub name: &'static str,
    pub matcher: Matcher<'n>,
    pub scope: Scope,
}

impl<'n> Strategy<'n> {
    pub const fn new(name: &'static str, matcher: Matcher<'n>, scope: Scope) -> Self {
        Self {
            name,
            matcher,
            scope,
        }
    }

    /// First matching element below `anchor`.
    pub fn find_first<'a, 'input>(
        &self,
        anchor: Node<'a, 'input>,
        tag: &str,
    ) -> Option<Node<'a, 'input>> {
        let matcher = self.matcher;
        let in_children = || element_children(anchor).find(|n| matcher.matches(*n, tag));
        let in_descendants = || descendant_elements(anchor).find(|n| matcher.matches(*n, tag));

        match self.scope {
            Scope::Children => in_children(),
            Scope::Descendants => in_descendants(),
            Scope::Nearest => in_children().or_else(in_descendants),
            Scope::Subtree => subtree_elements(anchor).find(|n| matcher.matches(*n, tag)),
        }
    }

    /// All matching elements below `anchor`, in document order.
    pub fn find_all<'a, 'input>(
        &self,
        anchor: Node<'a, 'input>,
        tag: &str,
    ) -> Vec<Node<'a, 'input>> {
        let matcher = self.matcher;
        let in_children = || {
            element_children(anchor)
                .filter(|n| matcher.matches(*n, tag))
                .collect::<Vec<_>>()
        };
        let in_descendants = || {
            descendant_elements(anchor)
                .filter(|n| matcher.matches(*n, tag))
                .collect::<Vec<_>>()
        };

        match self.scope {
            Scope::Children => in_children(),
            Scope::Descendants => in_descendants(),
            Scope::Nearest => {
                let found = in_children();
                if found.is_empty() {
                    in_descendants()
                } else {
                    found
                }
            }
            Scope::Subtree => subtree_elements(anchor)
                .filter(|n| matcher.matches(*n, tag))
                .collect(),
        }
    }
}

/// Evaluate `strategies` in order and return the first element found.
pub fn first_match<'a, 'input, 's, 'n>(
    strategies: &'s [Strategy<'n>],
    anchor: Node<'a, 'input>,
    tag: &str,
) -> Option<(Node<'a, 'input>, &'s Strategy<'n>)> {
    strategies
        .iter()
        .find_map(|s| s.find_first(anchor, tag).map(|node| (node, s)))
}

/// Evaluate `strategies` in order and return the first non-empty result set.
pub fn first_non_empty<'a, 'input, 's, 'n>(
    strategies: &'s [Strategy<'n>],
    anchor: Node<'a, 'input>,
    tag: &str,
) -> Option<(Vec<Node<'a, 'input>>, &'s Strategy<'n>)> {
    strategies.iter().find_map(|s| {
        let found = s.find_all(anchor, tag);
        (!found.is_empty()).then_some((found, s))
    })
}
