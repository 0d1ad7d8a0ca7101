//! Block layout: padding, block elements, tables, TOC and note lists.

use std::fmt::Write as _;

use crate::tree::{Kind, NodeId, header_label, label_from_str};

use super::Renderer;
use super::escape::push_escaped;
use super::state::{NoteKind, NotePrinting, OpenParagraph};

impl Renderer<'_> {
    /// Emit newlines until at least `n` blank-line equivalents precede the
    /// next output.
    pub(super) fn pad(&mut self, n: u8) {
        while self.state.padded < n {
            self.out.push('\n');
            self.state.padded += 1;
        }
    }

    /// Open `<p>` for `block`, remembering where it starts.
    fn open_paragraph(&mut self, block: NodeId) -> Option<OpenParagraph> {
        let saved = self.state.open_para.take();
        if !self.state.list_is_tight {
            self.state.open_para = Some(OpenParagraph {
                block,
                at: self.out.len(),
            });
            self.out.push_str("<p>");
        }
        saved
    }

    /// Paragraph-like block, including note definitions.
    pub(super) fn paragraph(&mut self, id: NodeId) {
        self.pad(2);
        let tight = self.state.list_is_tight;
        let saved = self.open_paragraph(id);

        self.render_children(id);
        self.state.open_para = saved;

        if let Some(printing) = self.state.printing.as_mut()
            && printing.paragraphs_left > 0
        {
            printing.paragraphs_left -= 1;
            if printing.paragraphs_left == 0 {
                let NotePrinting { kind, index, .. } = *printing;
                self.back_link(kind, index);
            }
        }

        if self.state.close_para {
            if !tight {
                self.out.push_str("</p>");
            }
        } else {
            self.state.close_para = true;
        }
        self.state.padded = 0;
    }

    fn back_link(&mut self, kind: NoteKind, index: usize) {
        let prefix = kind.prefix();
        let _ = write!(
            self.out,
            " <a href=\"#{prefix}ref:{index}\" title=\"return to body\" class=\"reverse{}\">&#160;&#8617;</a>",
            kind.class()
        );
    }

    /// Rendered heading level after applying the base header level.
    fn header_level(&self, level: u8) -> u8 {
        let level = u16::from(level) + u16::from(self.state.options.base_header_level);
        level.saturating_sub(1).clamp(1, 6) as u8
    }

    pub(super) fn heading(&mut self, id: NodeId, level: u8) {
        self.pad(2);
        let level = self.header_level(level);
        if self.state.options.no_labels {
            let _ = write!(self.out, "<h{level}>");
        } else {
            let _ = write!(self.out, "<h{level} id=\"");
            push_escaped(&mut self.out, &header_label(self.doc, id));
            self.out.push_str("\">");
        }
        self.render_children(id);
        let _ = write!(self.out, "</h{level}>");
        self.state.padded = 0;
    }

    pub(super) fn blockquote(&mut self, id: NodeId) {
        self.pad(2);
        self.out.push_str("<blockquote>\n");
        self.state.padded = 2;
        self.render_children(id);
        self.pad(1);
        self.out.push_str("</blockquote>");
        self.state.padded = 0;
    }

    pub(super) fn code_fenced(&mut self, id: NodeId) {
        let doc = self.doc;
        self.pad(2);
        self.out.push_str("<pre><code");

        let mut content = doc.first_child(id);
        if let Some(fence) = content.filter(|&n| doc.kind(n) == Kind::CodeFence) {
            if let Some(lang) = fence_language(doc.node_text(fence)) {
                self.out.push_str(" class=\"");
                push_escaped(&mut self.out, lang);
                self.out.push('"');
            }
            content = doc.next_sibling(fence);
        }

        self.out.push('>');
        self.render_raw_siblings(content);
        self.out.push_str("</code></pre>");
        self.state.padded = 0;
    }

    pub(super) fn code_indented(&mut self, id: NodeId) {
        self.pad(2);
        self.out.push_str("<pre><code>");
        self.render_raw_siblings(self.doc.first_child(id));
        self.out.push_str("</code></pre>");
        self.state.padded = 0;
    }

    pub(super) fn list(&mut self, id: NodeId, kind: Kind) {
        let saved = self.state.list_is_tight;
        self.state.list_is_tight = matches!(kind, Kind::ListBulleted | Kind::ListEnumerated);
        let tag = match kind {
            Kind::ListEnumerated | Kind::ListEnumeratedLoose => "ol",
            _ => "ul",
        };

        self.pad(2);
        let _ = write!(self.out, "<{tag}>");
        self.state.padded = 0;
        self.render_children(id);
        self.pad(1);
        let _ = write!(self.out, "</{tag}>");
        self.state.padded = 0;
        self.state.list_is_tight = saved;
    }

    pub(super) fn list_item(&mut self, id: NodeId) {
        self.pad(1);
        self.out.push_str("<li>");
        self.state.padded = 2;
        self.render_children(id);
        self.out.push_str("</li>");
        self.state.padded = 0;
    }

    pub(super) fn list_item_tight(&mut self, id: NodeId) {
        self.pad(1);
        self.out.push_str("<li>");
        let tight = self.state.list_is_tight;
        let saved = self.open_paragraph(id);

        self.state.padded = 2;
        self.render_children(id);
        self.state.open_para = saved;

        if self.state.close_para {
            if !tight {
                self.out.push_str("</p>");
            }
        } else {
            self.state.close_para = true;
        }

        self.out.push_str("</li>");
        self.state.padded = 0;
    }

    /// Consecutive definition lists share one `<dl>`.
    pub(super) fn definition_list(&mut self, id: NodeId) {
        let doc = self.doc;
        self.pad(2);
        if doc.prev_kind(id) != Some(Kind::DefinitionList) {
            self.out.push_str("<dl>\n");
        }
        self.state.padded = 2;
        self.render_children(id);
        self.pad(1);
        if doc.next_kind(id) != Some(Kind::DefinitionList) {
            self.out.push_str("</dl>\n");
        }
        self.state.padded = 1;
    }

    pub(super) fn definition_term(&mut self, id: NodeId) {
        self.pad(2);
        self.out.push_str("<dt>");
        self.render_children(id);
        self.out.push_str("</dt>\n");
        self.state.padded = 2;
    }

    /// A definition is tight unless a blank line separates its first block
    /// from further content.
    pub(super) fn definition(&mut self, id: NodeId) {
        let doc = self.doc;
        self.pad(2);
        self.out.push_str("<dd>");

        let saved = self.state.list_is_tight;
        let second = doc.first_child(id).and_then(|n| doc.next_sibling(n));
        let loose = second
            .is_some_and(|n| doc.kind(n) == Kind::Empty && doc.next_sibling(n).is_some());
        if !loose {
            self.state.list_is_tight = true;
        }

        self.render_children(id);
        self.out.push_str("</dd>");
        self.state.padded = 0;
        self.state.list_is_tight = saved;
    }

    pub(super) fn horizontal_rule(&mut self) {
        self.pad(2);
        self.out.push_str("<hr />");
        self.state.padded = 0;
    }

    pub(super) fn html_block(&mut self, id: NodeId) {
        self.pad(2);
        let text = self.doc.node_text(id);
        self.out.push_str(text);
        self.state.padded = u8::from(text.ends_with('\n'));
    }

    // ---- Tables ----

    /// Render a table, returning 1 when a following caption paragraph was
    /// used.
    pub(super) fn table(&mut self, id: NodeId) -> usize {
        let doc = self.doc;
        self.pad(2);
        self.out.push_str("<table>\n");

        let mut consumed = 0;
        if let Some((caption, label)) = self.table_caption(id) {
            self.out.push_str("<caption id=\"");
            push_escaped(&mut self.out, &label_from_str(doc.node_text(label)));
            self.out.push_str("\">");
            self.consume_delimiters(caption);
            self.render_children(caption);
            self.out.push_str("</caption>\n");
            consumed = 1;
        }

        self.state.padded = 2;
        self.read_column_alignments(id);

        self.out.push_str("<colgroup>\n");
        for &code in &self.state.table.alignments {
            let style = match code.to_ascii_lowercase() {
                'l' => "left",
                'r' => "right",
                'c' => "center",
                _ => {
                    self.out.push_str("<col />\n");
                    continue;
                }
            };
            let _ = write!(self.out, "<col style=\"text-align:{style};\"");
            if code.is_ascii_uppercase() {
                self.out.push_str(" class=\"extended\"");
            }
            self.out.push_str("/>\n");
        }
        self.out.push_str("</colgroup>\n");
        self.state.padded = 1;

        self.render_children(id);
        self.pad(1);
        self.out.push_str("</table>");
        self.state.padded = 0;
        consumed
    }

    /// A caption is a following paragraph made of a bracket, an optional
    /// label bracket and an optional newline.
    ///
    /// Returns the caption bracket and the node its label comes from.
    fn table_caption(&self, table: NodeId) -> Option<(NodeId, NodeId)> {
        let doc = self.doc;
        let para = doc.next_sibling(table)?;
        if doc.kind(para) != Kind::Paragraph {
            return None;
        }

        let caption = doc.first_child(para)?;
        if doc.kind(caption) != Kind::PairBracket {
            return None;
        }

        let mut label = caption;
        let mut next = doc.next_sibling(caption);
        if let Some(n) = next
            && doc.kind(n) == Kind::PairBracket
        {
            label = n;
            next = doc.next_sibling(n);
        }
        if let Some(n) = next
            && doc.kind(n) == Kind::TextNewline
        {
            next = doc.next_sibling(n);
        }

        next.is_none().then_some((caption, label))
    }

    /// Read column alignments from the separator row (the last row of the
    /// table's first section) and mark that row consumed.
    fn read_column_alignments(&mut self, table: NodeId) {
        let doc = self.doc;
        self.state.table.alignments.clear();
        self.state.table.cell_offset = 0;

        let Some(section) = doc.first_child(table) else {
            return;
        };
        let Some(separator) = doc.node(section).and_then(|n| n.last_child) else {
            return;
        };
        if doc.kind(separator) != Kind::TableRow {
            return;
        }

        for cell in doc.children(separator) {
            if doc.kind(cell) == Kind::TableCell {
                let code = alignment_code(doc.node_text(cell));
                self.state.table.alignments.push(code);
            }
        }
        self.state.consume(separator);
    }

    pub(super) fn table_header(&mut self, id: NodeId) {
        self.pad(2);
        self.out.push_str("<thead>\n");
        self.state.table.in_header = true;
        self.render_children(id);
        self.state.table.in_header = false;
        self.out.push_str("</thead>\n");
        self.state.padded = 1;
    }

    pub(super) fn table_section(&mut self, id: NodeId) {
        self.pad(2);
        self.out.push_str("<tbody>\n");
        self.state.padded = 2;
        self.render_children(id);
        self.out.push_str("</tbody>");
        self.state.padded = 0;
    }

    pub(super) fn table_row(&mut self, id: NodeId) {
        self.out.push_str("<tr>\n");
        self.state.table.cell_offset = 0;
        self.render_children(id);
        self.out.push_str("</tr>\n");
    }

    pub(super) fn table_cell(&mut self, id: NodeId) {
        let doc = self.doc;
        let tag = if self.state.table.in_header { "th" } else { "td" };
        let _ = write!(self.out, "\t<{tag}");

        match self.state.table.current_alignment().to_ascii_lowercase() {
            'l' => self.out.push_str(" style=\"text-align:left;\""),
            'r' => self.out.push_str(" style=\"text-align:right;\""),
            'c' => self.out.push_str(" style=\"text-align:center;\""),
            _ => {}
        }

        let span = doc
            .next_sibling(id)
            .filter(|&n| doc.kind(n) == Kind::TableDivider)
            .and_then(|n| doc.node(n))
            .map(|n| n.span.len as usize)
            .unwrap_or(1);
        if span > 1 {
            let _ = write!(self.out, " colspan=\"{span}\"");
        }

        self.out.push('>');
        self.render_children(id);
        let _ = writeln!(self.out, "</{tag}>");
        self.state.table.cell_offset += span.max(1);
    }

    // ---- Table of contents ----

    /// Nested list of every heading. Jumps of more than one level deeper
    /// are left out, and every list item opened is closed.
    pub(super) fn toc(&mut self) {
        let doc = self.doc;
        self.pad(2);
        self.out.push_str("<div class=\"TOC\">");

        let mut baseline = 0u8;
        let mut current = 0u8;
        let headers = self.state.headers.clone();

        for header in headers {
            let Some(level) = doc.kind(header).heading_level() else {
                continue;
            };
            let level = level.clamp(1, 6);

            if level == current {
                self.out.push_str("</li>\n");
            }

            if baseline == 0 {
                self.out.push_str("\n<ul>\n");
                baseline = level;
                current = level;
            }

            if level > current + 1 {
                continue;
            } else if level == current + 1 {
                self.out.push_str("\n\n<ul>\n");
                current += 1;
            } else if level < current {
                self.out.push_str("</li>\n");
                while current > level {
                    if current > baseline {
                        self.out.push_str("</ul></li>\n");
                    } else {
                        baseline = current - 1;
                    }
                    current -= 1;
                }
            }

            self.out.push_str("<li><a href=\"#");
            push_escaped(&mut self.out, &header_label(doc, header));
            self.out.push_str("\">");
            self.render_children(header);
            self.out.push_str("</a>");
        }

        while current > baseline {
            self.out.push_str("</li>\n</ul>\n");
            current -= 1;
        }
        if baseline != 0 {
            self.out.push_str("</li>\n</ul>\n");
        }

        self.out.push_str("</div>");
        self.state.padded = 0;
    }

    // ---- Note lists ----

    /// Render the list of notes of one kind referenced so far.
    ///
    /// Notes referenced from inside other notes are appended while the list
    /// is printed and are listed too.
    pub(super) fn note_list(&mut self, kind: NoteKind) {
        let doc = self.doc;
        if self.state.registry(kind).is_empty() {
            return;
        }

        self.pad(2);
        let _ = write!(
            self.out,
            "<div class=\"{}\">\n<hr />\n<ol>",
            kind.list_class()
        );
        self.state.padded = 0;

        let mut index = 1;
        while let Some(note) = self.state.registry(kind).get(index).cloned() {
            self.pad(2);
            let _ = writeln!(self.out, "<li id=\"{}:{index}\">", kind.prefix());
            self.state.padded = 6;

            if kind == NoteKind::Glossary {
                push_escaped(&mut self.out, &note.term);
                self.out.push_str(": ");
            }

            let paragraphs_left = doc
                .siblings(note.content)
                .filter(|&n| doc.kind(n).is_paragraph())
                .count();
            self.state.printing = Some(NotePrinting {
                kind,
                index,
                paragraphs_left,
            });

            self.render_siblings(note.content);

            self.pad(1);
            self.out.push_str("</li>");
            self.state.padded = 0;
            index += 1;
        }

        self.pad(2);
        self.out.push_str("</ol>\n</div>");
        self.state.padded = 0;
        self.state.printing = None;
    }
}

/// Language of a fenced code block from its opening fence line.
fn fence_language(fence: &str) -> Option<&str> {
    fence
        .trim_start()
        .trim_start_matches(['`', '~'])
        .split_whitespace()
        .next()
}

/// Alignment code of a separator cell such as `:---:` or `---:+`.
fn alignment_code(cell: &str) -> char {
    let text = cell.trim();
    let (text, extended) = match text.strip_suffix('+') {
        Some(rest) => (rest.trim_end(), true),
        None => (text, false),
    };
    let code = match (text.starts_with(':'), text.ends_with(':') && text.len() > 1) {
        (true, true) => 'c',
        (false, true) => 'r',
        (true, false) => 'l',
        (false, false) => 'n',
    };
    if extended {
        code.to_ascii_uppercase()
    } else {
        code
    }
}
