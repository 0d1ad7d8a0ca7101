//! Token tree → HTML rendering.
//!
//! A [`Renderer`] walks the tree once, writing into an owned output buffer.
//! Everything that depends on context accumulated during the walk (list
//! tightness, paragraph closing, note numbering, table layout) lives in its
//! [`RenderState`]. The per-kind handlers are split by concern:
//!
//! - `dispatch`: the sibling walk, depth guard, raw mode and inline tokens
//! - `pairs`: brackets, notes, CriticMarkup, code spans and autolinks
//! - `layout`: padding, block elements, tables, TOC and note lists
//! - `wrap`: the complete-document head and foot
//!
//! # Example
//!
//! ```
//! use mmd_html::html::{Options, render_fragment};
//! use mmd_html::metadata::Metadata;
//! use mmd_html::references::ReferenceTable;
//! use mmd_html::tree::{Document, Kind, NodeId};
//!
//! let mut doc = Document::new();
//! let para = doc.open(NodeId::ROOT, Kind::Paragraph);
//! doc.leaf(para, Kind::TextPlain, "a & b");
//! doc.close(para);
//!
//! let result = render_fragment(&doc, &ReferenceTable::new(), &Metadata::new(), Options::default());
//! assert_eq!(result.html, "<p>a &amp; b</p>");
//! ```

mod dispatch;
mod escape;
mod layout;
mod pairs;
mod state;
mod wrap;

pub use escape::{Glyph, Obfuscator, QuoteLanguage, escape_html, push_escaped, push_url};
pub use state::{
    Diagnostic, MAX_RENDER_DEPTH, NoteKind, NotePrinting, NoteRegistry, OpenParagraph, Options,
    RenderState, TableLayout,
};

use crate::metadata::Metadata;
use crate::references::ReferenceTable;
use crate::tree::Document;

/// Output of a render pass.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The rendered HTML.
    pub html: String,
    /// Non-fatal problems met along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Single-pass HTML renderer over one document.
pub struct Renderer<'a> {
    doc: &'a Document,
    refs: &'a ReferenceTable,
    meta: &'a Metadata,
    state: RenderState,
    out: String,
}

impl<'a> Renderer<'a> {
    /// Create a renderer with a fresh state.
    pub fn new(
        doc: &'a Document,
        refs: &'a ReferenceTable,
        meta: &'a Metadata,
        options: Options,
    ) -> Self {
        Self {
            doc,
            refs,
            meta,
            state: RenderState::new(doc, options),
            out: String::with_capacity(doc.source().len() * 2),
        }
    }

    /// Render the document body.
    pub fn render_body(&mut self) {
        self.render_node(self.doc.root());
    }

    /// Render the footnote, citation and glossary lists.
    ///
    /// Only notes referenced so far are listed, so call this after
    /// [`render_body`](Self::render_body).
    pub fn render_note_lists(&mut self) {
        self.note_list(NoteKind::Footnote);
        self.note_list(NoteKind::Citation);
        self.note_list(NoteKind::Glossary);
    }

    /// Output written so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Consume the renderer, returning its output and diagnostics.
    pub fn finish(self) -> RenderResult {
        RenderResult {
            html: self.out,
            diagnostics: self.state.diagnostics,
        }
    }
}

/// Render a document body followed by its note lists.
pub fn render_fragment(
    doc: &Document,
    refs: &ReferenceTable,
    meta: &Metadata,
    options: Options,
) -> RenderResult {
    let mut renderer = Renderer::new(doc, refs, meta, options);
    renderer.render_body();
    renderer.render_note_lists();
    renderer.finish()
}

/// Render a standalone HTML document with a head built from metadata.
pub fn render_complete(
    doc: &Document,
    refs: &ReferenceTable,
    meta: &Metadata,
    options: Options,
) -> RenderResult {
    let mut renderer = Renderer::new(doc, refs, meta, options);
    wrap::push_head(&mut renderer.out, meta);
    renderer.render_body();
    renderer.render_note_lists();
    wrap::push_foot(&mut renderer.out);
    renderer.finish()
}
