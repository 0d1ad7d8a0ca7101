//! Label derivation for anchors, header ids and reference lookup.

use super::{Document, Kind, NodeId};

/// Derive an anchor label from arbitrary text.
///
/// Keeps ASCII alphanumerics and `.`, `_`, `-`, `:` (lowercased) plus any
/// non-ASCII character; everything else, including whitespace, is dropped.
///
/// # Examples
///
/// ```
/// use mmd_html::tree::label_from_str;
///
/// assert_eq!(label_from_str("Chapter One"), "chapterone");
/// assert_eq!(label_from_str("[fig:Cat]"), "fig:cat");
/// assert_eq!(label_from_str("Über uns"), "Überuns");
/// ```
pub fn label_from_str(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if !c.is_ascii() {
                Some(c)
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ':') {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect()
}

/// Find the manual `[label]` token attached to a heading.
pub fn manual_label(doc: &Document, heading: NodeId) -> Option<NodeId> {
    doc.children(heading)
        .find(|&child| doc.kind(child) == Kind::ManualLabel)
}

/// Collect the visible source text of a node's leaves.
///
/// Structural markers, manual labels and consumed-looking tokens are
/// skipped; newlines collapse to a space.
pub fn text_content(doc: &Document, id: NodeId) -> String {
    let mut result = String::new();
    let mut stack = vec![id];

    while let Some(id) = stack.pop() {
        match doc.kind(id) {
            Kind::MarkerHeading
            | Kind::MarkerBlockquote
            | Kind::MarkerListBullet
            | Kind::MarkerListEnumerator
            | Kind::ManualLabel
            | Kind::Empty => continue,
            Kind::TextNewline | Kind::TextLinebreak => {
                if !result.is_empty() && !result.ends_with(' ') {
                    result.push(' ');
                }
                continue;
            }
            _ => {}
        }

        if doc.first_child(id).is_none() {
            result.push_str(doc.node_text(id));
            continue;
        }

        // Reversed so the first child is popped first.
        let mark = stack.len();
        stack.extend(doc.children(id));
        stack[mark..].reverse();
    }

    result
}

/// Anchor label for a heading: its manual label if present, else its text.
pub(crate) fn header_label(doc: &Document, heading: NodeId) -> String {
    match manual_label(doc, heading) {
        Some(label) => label_from_str(doc.node_text(label)),
        None => label_from_str(&text_content(doc, heading)),
    }
}
