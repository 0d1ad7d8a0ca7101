//! JSON interchange format for parsed documents.
//!
//! A parser running out of process hands the renderer a document as JSON:
//!
//! ```json
//! {
//!   "source": "Hello *you*",
//!   "root": {"kind": "doc_start", "children": [
//!     {"kind": "paragraph", "children": [
//!       {"kind": "text_plain", "start": 0, "len": 6},
//!       {"kind": "emph_start", "start": 6, "len": 1, "id": "e1", "mate": "e2"},
//!       {"kind": "text_plain", "start": 7, "len": 3},
//!       {"kind": "emph_stop", "start": 10, "len": 1, "id": "e2"}
//!     ]}
//!   ]},
//!   "metadata": [["title", "Greeting"]],
//!   "links": [{"label": "home", "url": "/"}],
//!   "footnotes": [{"label": "x", "content": [{"kind": "paragraph", "children": []}]}]
//! }
//! ```
//!
//! Containers may omit `start` / `len`; their span then covers their
//! children. `mate` names another node's `id`, and is linked both ways.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use super::{Document, Kind, NodeId, Span};
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use crate::references::{Link, ReferenceTable};

/// A document with everything the renderer consumes.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub references: ReferenceTable,
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct TreeFile {
    source: String,
    root: NodeSpec,
    #[serde(default)]
    metadata: Vec<(String, String)>,
    #[serde(default)]
    links: Vec<LinkSpec>,
    #[serde(default)]
    footnotes: Vec<NoteSpec>,
    #[serde(default)]
    citations: Vec<NoteSpec>,
    #[serde(default)]
    glossary: Vec<NoteSpec>,
}

#[derive(Debug, Deserialize)]
struct NodeSpec {
    kind: Kind,
    start: Option<u32>,
    len: Option<u32>,
    #[serde(default)]
    children: Vec<NodeSpec>,
    id: Option<String>,
    mate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkSpec {
    label: String,
    url: String,
    title: Option<String>,
    #[serde(default)]
    attributes: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct NoteSpec {
    /// Label, or the term for glossary entries.
    label: String,
    #[serde(default)]
    content: Vec<NodeSpec>,
}

/// Load a document from a JSON string.
pub fn from_str(json: &str) -> Result<LoadedDocument> {
    let file: TreeFile = serde_json::from_str(json)?;
    build(file)
}

/// Load a document from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<LoadedDocument> {
    let file: TreeFile = serde_json::from_reader(reader)?;
    build(file)
}

struct Builder {
    doc: Document,
    ids: HashMap<String, NodeId>,
    mates: Vec<(NodeId, String)>,
}

impl Builder {
    fn add(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let span = Span::new(spec.start.unwrap_or(0), spec.len.unwrap_or(0));
        let id = self.doc.add(parent, spec.kind, span);
        self.register(id, spec.id, spec.mate);
        self.add_children(id, spec.children, spec.start.is_none() || spec.len.is_none());
        id
    }

    fn register(&mut self, id: NodeId, name: Option<String>, mate: Option<String>) {
        if let Some(name) = name {
            self.ids.insert(name, id);
        }
        if let Some(mate) = mate {
            self.mates.push((id, mate));
        }
    }

    /// Add children, optionally stretching the parent's span over them.
    fn add_children(&mut self, parent: NodeId, children: Vec<NodeSpec>, fit: bool) {
        for child in children {
            self.add(parent, child);
        }
        if !fit {
            return;
        }

        let first = self.doc.first_child(parent).and_then(|c| self.doc.node(c));
        let last = self
            .doc
            .node(parent)
            .and_then(|n| n.last_child)
            .and_then(|c| self.doc.node(c));
        if let (Some(first), Some(last)) = (first, last) {
            let start = first.span.start;
            let end = last.span.end().max(start);
            self.doc.set_span(parent, Span::new(start, end - start));
        }
    }

    fn resolve_mates(&mut self) -> Result<()> {
        for (node, name) in std::mem::take(&mut self.mates) {
            let Some(&mate) = self.ids.get(&name) else {
                return Err(Error::InvalidTree(format!(
                    "node {} names unknown mate `{name}`",
                    node.0
                )));
            };
            self.doc.pair(node, mate);
        }
        Ok(())
    }

    /// Add note content under a detached container.
    fn note_content(&mut self, content: Vec<NodeSpec>) -> Option<NodeId> {
        let holder = self.doc.detached(Kind::Empty);
        self.add_children(holder, content, true);
        self.doc.first_child(holder)
    }
}

fn build(file: TreeFile) -> Result<LoadedDocument> {
    if file.root.kind != Kind::DocStart {
        return Err(Error::InvalidTree(format!(
            "root must be doc_start, found {:?}",
            file.root.kind
        )));
    }

    let mut builder = Builder {
        doc: Document::with_source(file.source),
        ids: HashMap::new(),
        mates: Vec::new(),
    };

    let root = file.root;
    builder.register(NodeId::ROOT, root.id, root.mate);
    builder.add_children(NodeId::ROOT, root.children, false);

    let mut references = ReferenceTable::new();
    for spec in file.links {
        let mut link = Link::new(spec.url);
        link.title = spec.title;
        link.attributes = spec.attributes;
        references.add_link(&spec.label, link);
    }
    for note in file.footnotes {
        let content = builder.note_content(note.content);
        references.add_footnote(&note.label, content);
    }
    for note in file.citations {
        let content = builder.note_content(note.content);
        references.add_citation(&note.label, content);
    }
    for note in file.glossary {
        let content = builder.note_content(note.content);
        references.add_glossary(&note.label, content);
    }

    builder.resolve_mates()?;
    builder.doc.validate()?;

    Ok(LoadedDocument {
        document: builder.doc,
        references,
        metadata: file.metadata.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "source": "Hello *you*",
        "root": {"kind": "doc_start", "children": [
            {"kind": "paragraph", "children": [
                {"kind": "text_plain", "start": 0, "len": 6},
                {"kind": "emph_start", "start": 6, "len": 1, "id": "e1", "mate": "e2"},
                {"kind": "text_plain", "start": 7, "len": 3},
                {"kind": "emph_stop", "start": 10, "len": 1, "id": "e2"}
            ]}
        ]},
        "metadata": [["Title", "Greeting"]],
        "links": [{"label": "Home", "url": "/", "title": "Start"}]
    }"#;

    #[test]
    fn test_load_sample() {
        let loaded = from_str(SAMPLE).unwrap();
        let doc = &loaded.document;

        let para = doc.first_child(NodeId::ROOT).unwrap();
        assert_eq!(doc.kind(para), Kind::Paragraph);
        assert_eq!(doc.node_text(para), "Hello *you*");

        let open = doc.children(para).nth(1).unwrap();
        let close = doc.children(para).nth(3).unwrap();
        assert_eq!(doc.mate(open), Some(close));
        assert_eq!(doc.mate(close), Some(open));

        assert_eq!(loaded.metadata.get("title"), Some("Greeting"));
        assert_eq!(loaded.references.link("home").unwrap().title.as_deref(), Some("Start"));
    }

    #[test]
    fn test_heading_kind_with_level() {
        let json = r#"{
            "source": "Hi",
            "root": {"kind": "doc_start", "children": [
                {"kind": {"heading": 2}, "children": [
                    {"kind": "text_plain", "start": 0, "len": 2}
                ]}
            ]}
        }"#;
        let loaded = from_str(json).unwrap();
        let heading = loaded.document.first_child(NodeId::ROOT).unwrap();
        assert_eq!(loaded.document.kind(heading), Kind::Heading(2));
    }

    #[test]
    fn test_unknown_mate_is_rejected() {
        let json = r#"{
            "source": "*",
            "root": {"kind": "doc_start", "children": [
                {"kind": "emph_start", "start": 0, "len": 1, "mate": "missing"}
            ]}
        }"#;
        assert!(matches!(from_str(json), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_span_outside_source_is_rejected() {
        let json = r#"{
            "source": "ab",
            "root": {"kind": "doc_start", "children": [
                {"kind": "text_plain", "start": 1, "len": 5}
            ]}
        }"#;
        assert!(from_str(json).is_err());
    }

    #[test]
    fn test_overflowing_span_is_rejected() {
        let json = r#"{
            "source": "ab",
            "root": {"kind": "doc_start", "children": [
                {"kind": "paragraph", "children": [
                    {"kind": "text_plain", "start": 4294967295, "len": 2}
                ]}
            ]}
        }"#;
        assert!(matches!(from_str(json), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_wrong_root_kind() {
        let json = r#"{"source": "", "root": {"kind": "paragraph"}}"#;
        assert!(matches!(from_str(json), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_footnote_content_is_detached() {
        let json = r#"{
            "source": "Note text",
            "root": {"kind": "doc_start"},
            "footnotes": [{"label": "n", "content": [
                {"kind": "def_footnote", "children": [
                    {"kind": "text_plain", "start": 0, "len": 9}
                ]}
            ]}]
        }"#;
        let loaded = from_str(json).unwrap();
        let note = loaded.references.footnote("n").unwrap();
        let content = note.content.unwrap();

        assert_eq!(loaded.document.kind(content), Kind::DefFootnote);
        assert!(loaded.document.first_child(NodeId::ROOT).is_none());
    }
}
