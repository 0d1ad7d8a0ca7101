//! Reference definitions supplied by the parser.
//!
//! The parser collects link, footnote, citation and glossary definitions
//! while it builds the tree. The renderer looks them up by normalized label
//! when it meets a bracket; note definitions point back into the document
//! arena at the blocks that make up their content.

use std::collections::HashMap;

use crate::tree::{NodeId, label_from_str};

/// A resolved link or image target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    /// Destination URL (empty when the definition had none).
    pub url: String,
    /// Optional title attribute.
    pub title: Option<String>,
    /// Normalized reference label, for reference-style definitions.
    pub label: Option<String>,
    /// Extra `key="value"` attributes from the definition.
    pub attributes: Vec<(String, String)>,
}

impl Link {
    /// Create a link to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an extra attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// A footnote, citation or glossary definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDefinition {
    /// Normalized label.
    pub label: String,
    /// Display text (the glossary term; the raw label otherwise).
    pub term: String,
    /// First block of the definition's content chain.
    pub content: Option<NodeId>,
}

/// All reference definitions of one document, keyed by normalized label.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    links: HashMap<String, Link>,
    footnotes: HashMap<String, NoteDefinition>,
    citations: HashMap<String, NoteDefinition>,
    glossary: HashMap<String, NoteDefinition>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link definition under `label`.
    pub fn add_link(&mut self, label: &str, mut link: Link) {
        let key = label_from_str(label);
        link.label = Some(key.clone());
        self.links.insert(key, link);
    }

    /// Register a footnote whose content starts at `content`.
    pub fn add_footnote(&mut self, label: &str, content: Option<NodeId>) {
        let def = note(label, label, content);
        self.footnotes.insert(def.label.clone(), def);
    }

    /// Register a citation whose content starts at `content`.
    pub fn add_citation(&mut self, label: &str, content: Option<NodeId>) {
        let def = note(label, label, content);
        self.citations.insert(def.label.clone(), def);
    }

    /// Register a glossary entry for `term`.
    pub fn add_glossary(&mut self, term: &str, content: Option<NodeId>) {
        let def = note(term, term, content);
        self.glossary.insert(def.label.clone(), def);
    }

    /// Look up a link definition.
    pub fn link(&self, label: &str) -> Option<&Link> {
        self.links.get(&label_from_str(label))
    }

    /// Look up a footnote definition.
    pub fn footnote(&self, label: &str) -> Option<&NoteDefinition> {
        self.footnotes.get(&label_from_str(label))
    }

    /// Look up a citation definition.
    pub fn citation(&self, label: &str) -> Option<&NoteDefinition> {
        self.citations.get(&label_from_str(label))
    }

    /// Look up a glossary definition.
    pub fn glossary(&self, label: &str) -> Option<&NoteDefinition> {
        self.glossary.get(&label_from_str(label))
    }

    /// Number of link definitions.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

fn note(label: &str, term: &str, content: Option<NodeId>) -> NoteDefinition {
    NoteDefinition {
        label: label_from_str(label),
        term: term.trim().to_string(),
        content,
    }
}
