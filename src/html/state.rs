//! Render options and the mutable state shared across one render pass.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::metadata::Metadata;
use crate::references::NoteDefinition;
use crate::tree::{Document, NodeId};

use super::escape::{Obfuscator, QuoteLanguage};

/// Nesting ceiling for sibling-chain walks.
///
/// Deeper subtrees are silently truncated.
pub const MAX_RENDER_DEPTH: usize = 1000;

/// Extension switches for one render.
///
/// # Examples
///
/// ```
/// use mmd_html::html::Options;
///
/// let options = Options::default().with_critic_accept(true);
/// assert!(options.critic);
/// assert!(!options.critic_reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Smart quotes, dashes and ellipses.
    pub smart: bool,
    /// Footnotes, citations and glossary entries.
    pub notes: bool,
    /// CriticMarkup change tracking.
    pub critic: bool,
    /// Apply all CriticMarkup changes.
    pub critic_accept: bool,
    /// Discard all CriticMarkup changes.
    pub critic_reject: bool,
    /// Plain Markdown compatibility (no figures, image ids or `&nbsp;`).
    pub compatibility: bool,
    /// Omit `id` attributes on headings.
    pub no_labels: bool,
    /// Level that a first-level heading is rendered at.
    pub base_header_level: u8,
    /// Quotation style for smart typography.
    pub quote_language: QuoteLanguage,
    /// Seed for e-mail address obfuscation.
    pub obfuscation_seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            smart: true,
            notes: true,
            critic: false,
            critic_accept: false,
            critic_reject: false,
            compatibility: false,
            no_labels: false,
            base_header_level: 1,
            quote_language: QuoteLanguage::English,
            obfuscation_seed: Obfuscator::DEFAULT_SEED,
        }
    }
}

impl Options {
    pub fn with_smart(mut self, smart: bool) -> Self {
        self.smart = smart;
        self
    }

    pub fn with_notes(mut self, notes: bool) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_critic(mut self, critic: bool) -> Self {
        self.critic = critic;
        self
    }

    /// Accept all changes. Enables CriticMarkup and clears reject mode.
    pub fn with_critic_accept(mut self, accept: bool) -> Self {
        self.critic_accept = accept;
        if accept {
            self.critic = true;
            self.critic_reject = false;
        }
        self
    }

    /// Reject all changes. Enables CriticMarkup and clears accept mode.
    pub fn with_critic_reject(mut self, reject: bool) -> Self {
        self.critic_reject = reject;
        if reject {
            self.critic = true;
            self.critic_accept = false;
        }
        self
    }

    /// Markdown compatibility mode. Also suppresses heading labels.
    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        if compatibility {
            self.no_labels = true;
        }
        self
    }

    pub fn with_no_labels(mut self, no_labels: bool) -> Self {
        self.no_labels = no_labels;
        self
    }

    /// Set the base header level (clamped to 1..=6).
    pub fn with_base_header_level(mut self, level: u8) -> Self {
        self.base_header_level = level.clamp(1, 6);
        self
    }

    pub fn with_quote_language(mut self, lang: QuoteLanguage) -> Self {
        self.quote_language = lang;
        self
    }

    pub fn with_obfuscation_seed(mut self, seed: u64) -> Self {
        self.obfuscation_seed = seed;
        self
    }

    /// Default options overlaid with the document's metadata.
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self::default().with_metadata(meta)
    }

    /// Overlay settings the document's metadata carries.
    ///
    /// Reads `quoteslanguage` and the header level keys; `htmlheaderlevel`
    /// takes precedence over `baseheaderlevel`. Unparseable values are
    /// logged and ignored.
    pub fn with_metadata(mut self, meta: &Metadata) -> Self {
        if let Some(value) = meta.get("quoteslanguage") {
            match value.parse() {
                Ok(lang) => self.quote_language = lang,
                Err(e) => warn!("ignoring metadata: {e}"),
            }
        }

        for key in ["baseheaderlevel", "htmlheaderlevel"] {
            if let Some(value) = meta.get(key) {
                match value.trim().parse::<u8>() {
                    Ok(level) => self = self.with_base_header_level(level),
                    Err(_) => warn!("ignoring metadata: {key} `{value}` is not a level"),
                }
            }
        }

        self
    }
}

/// The three kinds of back-referenced notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Footnote,
    Citation,
    Glossary,
}

impl NoteKind {
    /// Anchor prefix: `fn`, `cn` or `gn`.
    pub fn prefix(self) -> &'static str {
        match self {
            NoteKind::Footnote => "fn",
            NoteKind::Citation => "cn",
            NoteKind::Glossary => "gn",
        }
    }

    /// Class of the in-text reference link.
    pub fn class(self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Citation => "citation",
            NoteKind::Glossary => "glossary",
        }
    }

    /// Class of the wrapping `<div>` of the note list.
    pub fn list_class(self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnotes",
            NoteKind::Citation => "citations",
            NoteKind::Glossary => "glossary",
        }
    }

    /// Title of the in-text reference link.
    pub fn title(self) -> &'static str {
        match self {
            NoteKind::Footnote => "see footnote",
            NoteKind::Citation => "see citation",
            NoteKind::Glossary => "see glossary",
        }
    }
}

/// Notes of one kind in first-reference order.
#[derive(Debug, Clone, Default)]
pub struct NoteRegistry {
    entries: Vec<NoteDefinition>,
    by_label: HashMap<String, usize>,
}

impl NoteRegistry {
    /// Register a use of `note`.
    ///
    /// Returns the 1-based index and whether this was the first use.
    pub fn register(&mut self, note: &NoteDefinition) -> (usize, bool) {
        if let Some(&index) = self.by_label.get(&note.label) {
            return (index, false);
        }
        self.entries.push(note.clone());
        let index = self.entries.len();
        self.by_label.insert(note.label.clone(), index);
        debug!(label = %note.label, index, "registered note");
        (index, true)
    }

    /// Entry at a 1-based index.
    pub fn get(&self, index: usize) -> Option<&NoteDefinition> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The note currently being printed in a note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotePrinting {
    pub kind: NoteKind,
    /// 1-based index of the note.
    pub index: usize,
    /// Paragraphs left before the back-link is due.
    pub paragraphs_left: usize,
}

/// Column layout of the table being rendered.
#[derive(Debug, Clone, Default)]
pub struct TableLayout {
    /// One code per column: `l r c`, uppercase for extended columns, or
    /// `n` for no alignment.
    pub alignments: Vec<char>,
    /// Column of the next cell in the current row.
    pub cell_offset: usize,
    pub in_header: bool,
}

impl TableLayout {
    pub fn column_count(&self) -> usize {
        self.alignments.len()
    }

    /// Alignment code of the cell at the current offset.
    pub fn current_alignment(&self) -> char {
        self.alignments.get(self.cell_offset).copied().unwrap_or('n')
    }
}

/// A non-fatal problem met while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Offending node.
    pub node: NodeId,
    /// Raw token code of the node.
    pub code: u16,
    /// Source text of the node.
    pub context: String,
}

/// Cross-node context for one render pass.
/// A `<p>` emitted for `block` at byte offset `at` of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenParagraph {
    pub block: NodeId,
    pub at: usize,
}

pub struct RenderState {
    pub options: Options,
    pub depth: usize,
    /// Blank-line equivalents already emitted.
    pub padded: u8,
    pub list_is_tight: bool,
    /// Whether the enclosing paragraph still needs its `</p>`.
    pub close_para: bool,
    /// Block whose `<p>` is open with nothing rendered after it yet.
    pub open_para: Option<OpenParagraph>,
    pub printing: Option<NotePrinting>,
    pub footnotes: NoteRegistry,
    pub citations: NoteRegistry,
    pub glossary: NoteRegistry,
    pub table: TableLayout,
    /// Every heading in document order.
    pub headers: Vec<NodeId>,
    pub rng: Obfuscator,
    pub diagnostics: Vec<Diagnostic>,
    consumed: HashSet<NodeId>,
}

impl RenderState {
    /// Create the state for rendering `doc`.
    pub fn new(doc: &Document, options: Options) -> Self {
        let rng = Obfuscator::new(options.obfuscation_seed);
        Self {
            options,
            depth: 0,
            padded: 2,
            list_is_tight: false,
            close_para: true,
            open_para: None,
            printing: None,
            footnotes: NoteRegistry::default(),
            citations: NoteRegistry::default(),
            glossary: NoteRegistry::default(),
            table: TableLayout::default(),
            headers: doc.headers(),
            rng,
            diagnostics: Vec::new(),
            consumed: HashSet::new(),
        }
    }

    /// Mark a node as consumed so it renders nothing.
    pub fn consume(&mut self, id: NodeId) {
        self.consumed.insert(id);
    }

    pub fn is_consumed(&self, id: NodeId) -> bool {
        self.consumed.contains(&id)
    }

    pub fn registry(&self, kind: NoteKind) -> &NoteRegistry {
        match kind {
            NoteKind::Footnote => &self.footnotes,
            NoteKind::Citation => &self.citations,
            NoteKind::Glossary => &self.glossary,
        }
    }

    pub fn registry_mut(&mut self, kind: NoteKind) -> &mut NoteRegistry {
        match kind {
            NoteKind::Footnote => &mut self.footnotes,
            NoteKind::Citation => &mut self.citations,
            NoteKind::Glossary => &mut self.glossary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(label: &str) -> NoteDefinition {
        NoteDefinition {
            label: label.to_string(),
            term: label.to_string(),
            content: None,
        }
    }

    #[test]
    fn test_registry_first_use_order() {
        let mut reg = NoteRegistry::default();
        assert_eq!(reg.register(&def("x")), (1, true));
        assert_eq!(reg.register(&def("x")), (1, false));
        assert_eq!(reg.register(&def("y")), (2, true));
        assert_eq!(reg.register(&def("x")), (1, false));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(2).unwrap().label, "y");
        assert!(reg.get(0).is_none());
    }

    #[test]
    fn test_accept_and_reject_are_exclusive() {
        let options = Options::default()
            .with_critic_accept(true)
            .with_critic_reject(true);
        assert!(options.critic_reject);
        assert!(!options.critic_accept);
        assert!(options.critic);
    }

    #[test]
    fn test_options_from_metadata() {
        let meta = Metadata::new()
            .with("Quotes Language", "german")
            .with("Base Header Level", "3");
        let options = Options::from_metadata(&meta);

        assert_eq!(options.quote_language, QuoteLanguage::German);
        assert_eq!(options.base_header_level, 3);
    }

    #[test]
    fn test_options_from_metadata_ignores_bad_values() {
        let meta = Metadata::new()
            .with("quoteslanguage", "klingon")
            .with("htmlheaderlevel", "deep");
        let options = Options::default().with_metadata(&meta);
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_consumed_is_idempotent() {
        let doc = Document::new();
        let mut state = RenderState::new(&doc, Options::default());
        state.consume(NodeId(3));
        state.consume(NodeId(3));
        assert!(state.is_consumed(NodeId(3)));
        assert!(!state.is_consumed(NodeId(4)));
        assert_eq!(state.padded, 2);
        assert!(state.close_para);
        assert!(state.open_para.is_none());
    }

    #[test]
    fn test_table_layout_defaults_outside_columns() {
        let layout = TableLayout {
            alignments: vec!['l', 'C'],
            cell_offset: 5,
            in_header: false,
        };
        assert_eq!(layout.column_count(), 2);
        assert_eq!(layout.current_alignment(), 'n');
    }
}
