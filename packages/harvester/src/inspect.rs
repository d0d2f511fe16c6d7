//! Structure dump of a feed document, for diagnosing namespace layouts.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::Result;
use crate::http::bytes_to_string;
use crate::locator::ENTRY_TAG;
use crate::xml::{element_children, element_text, has_local_name, local_name, qualified_name};

/// Levels of the hierarchy shown below the root.
const MAX_DEPTH: usize = 3;

/// Children shown per element before eliding the rest.
const MAX_CHILDREN: usize = 5;

/// Children of the first entry listed in the dump.
const ENTRY_CHILD_PREVIEW: usize = 10;

/// Characters of text shown per entry child.
const TEXT_PREVIEW_CHARS: usize = 50;

/// Describe the structure of a feed document.
///
/// The dump lists the root element, the element hierarchy a few levels deep,
/// and every element whose local name is `entry` regardless of namespace.
///
/// # Examples
/// ```
/// use placsp_harvester::inspect::inspect_document;
///
/// let dump = inspect_document("<feed><entry><id>1</id></entry></feed>").unwrap();
/// assert!(dump.contains("- entry #1: entry (parent: feed)"));
/// assert!(dump.contains("Total found: 1"));
/// ```
pub fn inspect_document(xml: &str) -> Result<String> {
    let doc = Document::parse(xml.trim_start_matches('\u{feff}'))?;
    let root = doc.root_element();
    let mut out = String::new();

    let attributes: Vec<String> = root
        .attributes()
        .map(|attr| format!("{}=\"{}\"", attr.name(), attr.value()))
        .collect();

    let _ = writeln!(out, "Root tag: {}", qualified_name(root));
    let _ = writeln!(out, "Root attributes: [{}]", attributes.join(", "));

    let _ = writeln!(out, "\nElement hierarchy (first {MAX_DEPTH} levels):");
    write_hierarchy(&mut out, root, 0);

    let _ = writeln!(out, "\n'{ENTRY_TAG}' elements found:");
    let entries: Vec<Node<'_, '_>> = root
        .descendants()
        .filter(|n| n.is_element() && has_local_name(*n, ENTRY_TAG))
        .collect();

    for (index, entry) in entries.iter().enumerate() {
        let parent = entry.parent_element().map_or("root", local_name);
        let _ = writeln!(
            out,
            "  - entry #{}: {} (parent: {parent})",
            index + 1,
            qualified_name(*entry)
        );

        if index == 0 {
            let _ = writeln!(out, "    Children of first entry:");
            for child in element_children(*entry).take(ENTRY_CHILD_PREVIEW) {
                let preview = element_text(child)
                    .map(|text| text.chars().take(TEXT_PREVIEW_CHARS).collect::<String>())
                    .unwrap_or_else(|| "No text".to_string());
                let _ = writeln!(out, "      - {}: {preview}...", local_name(child));
            }
        }
    }

    if entries.is_empty() {
        let _ = writeln!(out, "  No '{ENTRY_TAG}' elements found");
    } else {
        let _ = writeln!(out, "  Total found: {}", entries.len());
    }

    Ok(out)
}

/// Read a feed file and describe its structure.
pub fn inspect_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    inspect_document(&bytes_to_string(&bytes, &path.display().to_string()))
}

fn write_hierarchy(out: &mut String, node: Node<'_, '_>, level: usize) {
    let indent = "  ".repeat(level);
    let _ = writeln!(out, "{indent}- {} ({})", local_name(node), qualified_name(node));

    if level >= MAX_DEPTH {
        return;
    }

    let children: Vec<Node<'_, '_>> = element_children(node).collect();
    for child in children.iter().take(MAX_CHILDREN) {
        write_hierarchy(out, *child, level + 1);
    }
    if children.len() > MAX_CHILDREN {
        let _ = writeln!(
            out,
            "{indent}  ... (and {} more)",
            children.len() - MAX_CHILDREN
        );
    }
}
