//! Arena-backed token tree consumed by the renderer.
//!
//! The tree is produced by an external parser. Every node refers to a byte
//! range of one immutable source buffer, and nodes are linked with
//! parent / child / sibling indices plus a non-owning `mate` link between
//! paired delimiters.
//!
//! # Example
//!
//! ```
//! use mmd_html::tree::{Document, Kind, NodeId};
//!
//! let mut doc = Document::new();
//! let para = doc.open(NodeId::ROOT, Kind::Paragraph);
//! doc.leaf(para, Kind::TextPlain, "Hello");
//! doc.close(para);
//!
//! assert_eq!(doc.node_text(para), "Hello");
//! assert_eq!(doc.children(NodeId::ROOT).count(), 1);
//! ```

mod label;
mod node;

#[cfg(feature = "serde")]
pub mod json;

pub(crate) use label::header_label;
pub use label::{label_from_str, manual_label, text_content};
pub use node::{Kind, Node, NodeId, Span};

use crate::error::{Error, Result};

/// A parsed document: source text plus its token tree.
///
/// The tree uses a parent-pointer / first-child / next-sibling
/// representation; index 0 is always the root.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes in the tree (index 0 is always the root).
    nodes: Vec<Node>,
    /// Source text (nodes reference ranges into this).
    source: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document with a root node.
    pub fn new() -> Self {
        Self::with_source(String::new())
    }

    /// Create a document over existing source text.
    ///
    /// The root spans the whole source.
    pub fn with_source(source: impl Into<String>) -> Self {
        let source = source.into();
        let root = Node::new(Kind::DocStart, Span::new(0, source.len() as u32));
        Self {
            nodes: vec![root],
            source,
        }
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get the kind of a node (`Empty` for out-of-range ids).
    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).map(|n| n.kind).unwrap_or(Kind::Empty)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the entire source buffer.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get source text for a span.
    ///
    /// Out-of-range or non-boundary spans yield an empty string.
    pub fn text(&self, span: Span) -> &str {
        let start = span.start as usize;
        let end = span.end() as usize;
        self.source.get(start..end).unwrap_or("")
    }

    /// Source text covered by a node.
    pub fn node_text(&self, id: NodeId) -> &str {
        self.node(id).map(|n| self.text(n.span)).unwrap_or("")
    }

    /// Text between a pair's opening and closing delimiter children.
    ///
    /// Falls back to the node's full text when it has no delimiter children.
    pub fn inner_text(&self, id: NodeId) -> &str {
        let Some(node) = self.node(id) else {
            return "";
        };
        match (node.first_child, node.last_child) {
            (Some(first), Some(last)) if first != last => {
                let (Some(open), Some(close)) = (self.node(first), self.node(last)) else {
                    return "";
                };
                let start = open.span.end();
                let end = close.span.start.max(start);
                self.text(Span::new(start, end - start))
            }
            _ => self.text(node.span),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.first_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.prev_sibling)
    }

    pub fn mate(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.mate)
    }

    /// Kind of the next sibling, if any.
    pub fn next_kind(&self, id: NodeId) -> Option<Kind> {
        self.next_sibling(id).map(|n| self.kind(n))
    }

    /// Kind of the previous sibling, if any.
    pub fn prev_kind(&self, id: NodeId) -> Option<Kind> {
        self.prev_sibling(id).map(|n| self.kind(n))
    }

    /// Whether a delimiter opens its pair (its span starts before its mate's).
    ///
    /// Returns `None` for unmatched delimiters.
    pub fn opens_pair(&self, id: NodeId) -> Option<bool> {
        let node = self.node(id)?;
        let mate = self.node(node.mate?)?;
        Some(node.span.start < mate.span.start)
    }

    // ---- Construction ----

    /// Allocate a detached node and return its ID.
    pub fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append text to the source buffer and return its span.
    pub fn append_source(&mut self, text: &str) -> Span {
        let start = self.source.len() as u32;
        self.source.push_str(text);
        self.nodes[0].span = Span::new(0, self.source.len() as u32);
        Span::new(start, text.len() as u32)
    }

    /// Append a child node to a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let last = self.node(parent).and_then(|n| n.last_child);

        if let Some(child_node) = self.nodes.get_mut(child.index()) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = last;
            child_node.next_sibling = None;
        }

        match last {
            Some(last) => {
                if let Some(last_node) = self.nodes.get_mut(last.index()) {
                    last_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.nodes.get_mut(parent.index()) {
                    parent_node.first_child = Some(child);
                }
            }
        }

        if let Some(parent_node) = self.nodes.get_mut(parent.index()) {
            parent_node.last_child = Some(child);
        }
    }

    /// Allocate a container outside the document body.
    ///
    /// Note definitions hang their content under such a node so it is
    /// rendered only in the note lists.
    pub fn detached(&mut self, kind: Kind) -> NodeId {
        let start = self.source.len() as u32;
        self.alloc_node(Node::new(kind, Span::new(start, 0)))
    }

    /// Add a node with an explicit span under `parent`.
    pub fn add(&mut self, parent: NodeId, kind: Kind, span: Span) -> NodeId {
        let id = self.alloc_node(Node::new(kind, span));
        self.append_child(parent, id);
        id
    }

    /// Append `text` to the source and add a leaf node covering it.
    pub fn leaf(&mut self, parent: NodeId, kind: Kind, text: &str) -> NodeId {
        let span = self.append_source(text);
        self.add(parent, kind, span)
    }

    /// Add a container starting at the current end of the source.
    ///
    /// Call [`close`](Self::close) after its children are added so its span
    /// covers them.
    pub fn open(&mut self, parent: NodeId, kind: Kind) -> NodeId {
        let start = self.source.len() as u32;
        self.add(parent, kind, Span::new(start, 0))
    }

    /// Extend a container's span to the current end of the source.
    pub fn close(&mut self, id: NodeId) {
        let end = self.source.len() as u32;
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.span.len = end.saturating_sub(node.span.start);
        }
    }

    /// Replace a node's span.
    pub fn set_span(&mut self, id: NodeId, span: Span) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.span = span;
        }
    }

    /// Link two delimiters as mates.
    pub fn pair(&mut self, a: NodeId, b: NodeId) {
        if let Some(node) = self.nodes.get_mut(a.index()) {
            node.mate = Some(b);
        }
        if let Some(node) = self.nodes.get_mut(b.index()) {
            node.mate = Some(a);
        }
    }

    // ---- Traversal ----

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            current: self.first_child(parent),
        }
    }

    /// Iterate over a sibling chain starting at `first`.
    pub fn siblings(&self, first: Option<NodeId>) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            current: first,
        }
    }

    /// Iterate over all nodes below the root in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter {
            doc: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Heading nodes reachable from the root, in document order.
    pub fn headers(&self) -> Vec<NodeId> {
        self.iter_dfs()
            .filter(|&id| self.kind(id).heading_level().is_some())
            .collect()
    }

    /// Check the structural invariants the renderer relies on.
    ///
    /// Spans must lie inside the source on char boundaries, mates must be
    /// mutual, and sibling / parent links must agree with each other.
    pub fn validate(&self) -> Result<()> {
        let count = self.nodes.len();
        let in_arena = |id: Option<NodeId>| id.is_none_or(|id| id.index() < count);

        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index as u32);
            let Some(end) = node.span.checked_end() else {
                return Err(Error::InvalidTree(format!(
                    "node {index} span {}+{} overflows",
                    node.span.start, node.span.len
                )));
            };
            let end = end as usize;
            if end > self.source.len()
                || !self.source.is_char_boundary(node.span.start as usize)
                || !self.source.is_char_boundary(end)
            {
                return Err(Error::InvalidTree(format!(
                    "node {index} span {}..{end} is outside the source",
                    node.span.start
                )));
            }

            let links = [
                node.parent,
                node.first_child,
                node.last_child,
                node.prev_sibling,
                node.next_sibling,
                node.mate,
            ];
            if !links.into_iter().all(in_arena) {
                return Err(Error::InvalidTree(format!(
                    "node {index} links outside the arena"
                )));
            }

            if let Some(mate) = node.mate
                && self.mate(mate) != Some(id)
            {
                return Err(Error::InvalidTree(format!(
                    "node {index} mate {} does not point back",
                    mate.0
                )));
            }

            if let Some(next) = node.next_sibling
                && (self.prev_sibling(next) != Some(id)
                    || self.node(next).and_then(|n| n.parent) != node.parent)
            {
                return Err(Error::InvalidTree(format!(
                    "node {index} sibling {} is not linked back",
                    next.0
                )));
            }

            let mut steps = 0usize;
            for child in self.children(id) {
                if self.node(child).and_then(|n| n.parent) != Some(id) {
                    return Err(Error::InvalidTree(format!(
                        "node {} is listed under {index} but has another parent",
                        child.0
                    )));
                }
                steps += 1;
                if steps > count {
                    return Err(Error::InvalidTree(format!(
                        "children of node {index} form a cycle"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Iterator over a sibling chain.
pub struct ChildIter<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Depth-first iterator over all nodes.
pub struct DfsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.doc.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}
