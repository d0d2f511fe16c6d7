//! XML helpers shared by the namespace, locator and extraction layers.

mod utils;

pub use utils::{
    descendant_elements, element_children, element_text, has_local_name, is_qualified,
    is_unqualified, local_name, namespace_uri, non_empty_attribute, qualified_name,
    subtree_elements,
};
