//! # mmd-html
//!
//! HTML rendering backend for MultiMarkdown-style token trees.
//!
//! ## Features
//!
//! - Single-pass rendering of an already-parsed token tree
//! - Smart typography with localized quotation marks
//! - Footnotes, citations and glossary entries numbered by first use
//! - CriticMarkup change tracking (markup, accept or reject)
//! - Tables, definition lists, figures and a generated table of contents
//! - Bounded recursion on adversarial input
//!
//! ## Quick Start
//!
//! ```
//! use mmd_html::{Document, Kind, Metadata, NodeId, Options, ReferenceTable, render_fragment};
//!
//! let mut doc = Document::new();
//! let heading = doc.open(NodeId::ROOT, Kind::Heading(1));
//! doc.leaf(heading, Kind::MarkerHeading, "# ");
//! doc.leaf(heading, Kind::TextPlain, "Hello World");
//! doc.close(heading);
//!
//! let result = render_fragment(&doc, &ReferenceTable::new(), &Metadata::new(), Options::default());
//! assert_eq!(result.html, "<h1 id=\"helloworld\">Hello World</h1>");
//! ```
//!
//! ## Working with References
//!
//! Link and note definitions are looked up by normalized label. Note
//! content is a chain of blocks stored in the same arena, usually under a
//! detached container so it is not rendered with the body:
//!
//! ```
//! use mmd_html::{Document, Kind, Metadata, NodeId, Options, ReferenceTable, render_fragment};
//!
//! let mut doc = Document::new();
//! let para = doc.open(NodeId::ROOT, Kind::Paragraph);
//! doc.leaf(para, Kind::TextPlain, "Claim");
//! let note = doc.open(para, Kind::PairBracketFootnote);
//! doc.leaf(note, Kind::BracketFootnoteLeft, "[^");
//! doc.leaf(note, Kind::TextPlain, "src");
//! doc.leaf(note, Kind::BracketRight, "]");
//! doc.close(note);
//! doc.close(para);
//!
//! let holder = doc.detached(Kind::Empty);
//! let def = doc.open(holder, Kind::DefFootnote);
//! doc.leaf(def, Kind::TextPlain, "Source.");
//! doc.close(def);
//!
//! let mut refs = ReferenceTable::new();
//! refs.add_footnote("src", doc.first_child(holder));
//!
//! let html = render_fragment(&doc, &refs, &Metadata::new(), Options::default()).html;
//! assert!(html.contains("<a href=\"#fn:1\" id=\"fnref:1\""));
//! assert!(html.contains("<li id=\"fn:1\">"));
//! ```

pub mod error;
pub mod html;
pub mod metadata;
pub mod references;
pub mod tree;

pub use error::{Error, Result};
pub use html::{Options, RenderResult, Renderer, render_complete, render_fragment};
pub use metadata::Metadata;
pub use references::{Link, NoteDefinition, ReferenceTable};
pub use tree::{Document, Kind, Node, NodeId, Span};
