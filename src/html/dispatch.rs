//! Sibling-chain walk and per-kind dispatch.

use tracing::{debug, trace, warn};

use crate::tree::{Kind, NodeId};

use super::Renderer;
use super::escape::{Glyph, push_escaped};
use super::state::{Diagnostic, MAX_RENDER_DEPTH};

impl Renderer<'_> {
    /// Render a sibling chain starting at `first`.
    ///
    /// Each node reports how many following siblings it consumed; those are
    /// skipped. At the depth ceiling nothing is rendered.
    pub fn render_siblings(&mut self, first: Option<NodeId>) {
        if self.state.depth >= MAX_RENDER_DEPTH {
            debug!(depth = self.state.depth, "render depth ceiling reached, truncating");
            return;
        }

        self.state.depth += 1;
        let mut current = first;
        while let Some(id) = current {
            let consumed = if self.state.is_consumed(id) {
                trace!(node = id.0, "skipping consumed node");
                0
            } else {
                self.render_node(id)
            };
            current = self.skip_siblings(id, consumed);
        }
        self.state.depth -= 1;
    }

    /// Render the children of `id`.
    pub(super) fn render_children(&mut self, id: NodeId) {
        self.render_siblings(self.doc.first_child(id));
    }

    /// Render a sibling chain in raw mode: reserved characters escaped,
    /// inline markup ignored.
    pub fn render_raw_siblings(&mut self, first: Option<NodeId>) {
        if self.state.depth >= MAX_RENDER_DEPTH {
            debug!(depth = self.state.depth, "raw render depth ceiling reached, truncating");
            return;
        }

        self.state.depth += 1;
        let mut current = first;
        while let Some(id) = current {
            let consumed = if self.state.is_consumed(id) {
                0
            } else {
                self.render_raw_node(id)
            };
            current = self.skip_siblings(id, consumed);
        }
        self.state.depth -= 1;
    }

    /// The sibling after `id` and the `count` siblings following it.
    fn skip_siblings(&self, id: NodeId, count: usize) -> Option<NodeId> {
        let mut next = self.doc.next_sibling(id);
        for _ in 0..count {
            next = next.and_then(|n| self.doc.next_sibling(n));
        }
        next
    }

    /// Render one node in raw mode, returning the number of following
    /// siblings it consumed.
    pub(super) fn render_raw_node(&mut self, id: NodeId) -> usize {
        let doc = self.doc;
        match doc.kind(id) {
            Kind::Backtick => self.out.push_str(doc.node_text(id)),
            Kind::Ampersand => self.out.push_str("&amp;"),
            Kind::AngleLeft => self.out.push_str("&lt;"),
            Kind::AngleRight => self.out.push_str("&gt;"),
            Kind::QuoteDouble => self.out.push_str("&quot;"),
            Kind::EscapedCharacter => {
                self.out.push('\\');
                let text = doc.node_text(id);
                push_escaped(&mut self.out, text.get(1..).unwrap_or(""));
            }
            Kind::CodeFence => return 1,
            Kind::Empty => {}
            _ => match doc.first_child(id) {
                Some(child) => self.render_raw_siblings(Some(child)),
                None => push_escaped(&mut self.out, doc.node_text(id)),
            },
        }
        0
    }

    /// Render one node, returning the number of following siblings it
    /// consumed.
    pub(super) fn render_node(&mut self, id: NodeId) -> usize {
        let doc = self.doc;
        let kind = doc.kind(id);

        match kind {
            // ---- Blocks ----
            Kind::DocStart | Kind::LineListBulleted | Kind::LineListEnumerated => {
                self.render_children(id)
            }
            Kind::Paragraph | Kind::DefFootnote | Kind::DefCitation | Kind::DefGlossary => {
                self.paragraph(id)
            }
            Kind::Heading(level) | Kind::SetextHeading(level) => self.heading(id, level),
            Kind::Blockquote => self.blockquote(id),
            Kind::CodeFenced => self.code_fenced(id),
            Kind::CodeIndented => self.code_indented(id),
            Kind::ListBulleted
            | Kind::ListBulletedLoose
            | Kind::ListEnumerated
            | Kind::ListEnumeratedLoose => self.list(id, kind),
            Kind::ListItem => self.list_item(id),
            Kind::ListItemTight => self.list_item_tight(id),
            Kind::DefinitionList => self.definition_list(id),
            Kind::DefinitionTerm => self.definition_term(id),
            Kind::Definition => self.definition(id),
            Kind::Table => return self.table(id),
            Kind::TableHeader => self.table_header(id),
            Kind::TableSection => self.table_section(id),
            Kind::TableRow => self.table_row(id),
            Kind::TableCell => self.table_cell(id),
            Kind::HorizontalRule => self.horizontal_rule(),
            Kind::HtmlBlock => self.html_block(id),
            Kind::TocPlaceholder => self.toc(),

            // ---- Silent ----
            Kind::Empty
            | Kind::Meta
            | Kind::CodeFence
            | Kind::ManualLabel
            | Kind::TableDivider
            | Kind::MarkerBlockquote
            | Kind::MarkerHeading
            | Kind::MarkerListBullet
            | Kind::MarkerListEnumerator => {}

            // ---- Inline formatting ----
            Kind::EmphStart => self.emphasis(id, "<em>"),
            Kind::EmphStop => self.emphasis(id, "</em>"),
            Kind::StrongStart => self.emphasis(id, "<strong>"),
            Kind::StrongStop => self.emphasis(id, "</strong>"),
            Kind::Subscript => self.script(id, "sub", '~'),
            Kind::Superscript => self.script(id, "sup", '^'),

            // ---- Smart typography ----
            Kind::Apostrophe => self.smart(id, Glyph::Apostrophe),
            Kind::DashN => self.smart(id, Glyph::EnDash),
            Kind::DashM => self.smart(id, Glyph::EmDash),
            Kind::Ellipsis => self.smart(id, Glyph::Ellipsis),
            Kind::QuoteSingle => match doc.opens_pair(id) {
                Some(opens) if self.state.options.smart => self.glyph(if opens {
                    Glyph::LeftSingle
                } else {
                    Glyph::RightSingle
                }),
                _ => self.out.push('\''),
            },
            Kind::QuoteDouble => match doc.opens_pair(id) {
                Some(opens) if self.state.options.smart => self.glyph(if opens {
                    Glyph::LeftDouble
                } else {
                    Glyph::RightDouble
                }),
                _ => self.out.push_str("&quot;"),
            },
            Kind::QuoteRightAlt => {
                if doc.mate(id).is_some() && self.state.options.smart {
                    self.glyph(Glyph::RightDouble);
                } else {
                    self.out.push_str("''");
                }
            }
            Kind::Backtick => self.backtick(id),

            // ---- Characters ----
            Kind::Ampersand | Kind::AmpersandLong => self.out.push_str("&amp;"),
            Kind::AngleLeft => self.out.push_str("&lt;"),
            Kind::AngleRight => self.out.push_str("&gt;"),
            Kind::EscapedCharacter => self.escaped_character(id),
            Kind::IndentSpace | Kind::NonIndentSpace => self.out.push(' '),
            Kind::IndentTab => self.out.push('\t'),
            Kind::TextNewline => {
                if doc.next_sibling(id).is_some() {
                    self.out.push('\n');
                }
            }
            Kind::TextLinebreak => {
                if doc.next_sibling(id).is_some() {
                    self.out.push_str("<br />\n");
                    self.state.padded = 1;
                }
            }

            // ---- Math ----
            Kind::MathBracketOpen => self.math_delimiter(id, "<span class=\"math\">\\[", "\\["),
            Kind::MathBracketClose => self.math_delimiter(id, "\\]</span>", "\\]"),
            Kind::MathParenOpen => self.math_delimiter(id, "<span class=\"math\">\\(", "\\("),
            Kind::MathParenClose => self.math_delimiter(id, "\\)</span>", "\\)"),
            Kind::MathDollarSingle => match doc.opens_pair(id) {
                Some(true) => self.out.push_str("<span class=\"math\">\\("),
                Some(false) => self.out.push_str("\\)</span>"),
                None => self.out.push('$'),
            },
            Kind::MathDollarDouble => match doc.opens_pair(id) {
                Some(true) => self.out.push_str("<span class=\"math\">\\["),
                Some(false) => self.out.push_str("\\]</span>"),
                None => self.out.push_str("$$"),
            },

            // ---- CriticMarkup delimiters ----
            Kind::CriticAddOpen => self.out.push_str("{++"),
            Kind::CriticAddClose => self.out.push_str("++}"),
            Kind::CriticDelOpen => self.out.push_str("{--"),
            Kind::CriticDelClose => self.out.push_str("--}"),
            Kind::CriticComOpen => self.out.push_str("{&gt;&gt;"),
            Kind::CriticComClose => self.out.push_str("&lt;&lt;}"),
            Kind::CriticHiOpen => self.out.push_str("{=="),
            Kind::CriticHiClose => self.out.push_str("==}"),
            Kind::CriticSubOpen => self.out.push_str("{~~"),
            Kind::CriticSubDiv => self.out.push_str("~&gt;"),
            Kind::CriticSubClose => self.out.push_str("~~}"),
            Kind::CriticSubDivA => self.out.push('~'),
            Kind::CriticSubDivB => self.out.push_str("&gt;"),

            // ---- Pairs ----
            Kind::PairBacktick => self.code_span(id),
            Kind::PairAngle => self.angle(id),
            Kind::PairBracket | Kind::PairBracketImage => return self.bracket(id),
            Kind::PairBracketFootnote => self.footnote(id),
            Kind::PairBracketCitation => return self.citation(id),
            Kind::PairBracketGlossary => self.glossary(id),
            Kind::PairBracketVariable => self.variable(id),
            Kind::PairCriticAdd
            | Kind::PairCriticDel
            | Kind::PairCriticCom
            | Kind::PairCriticHi
            | Kind::PairCriticSubDel
            | Kind::PairCriticSubAdd => self.critic(id, kind),
            Kind::PairBraces
            | Kind::PairMath
            | Kind::PairParen
            | Kind::PairQuoteSingle
            | Kind::PairQuoteDouble
            | Kind::PairStar
            | Kind::PairUnderscore => self.render_children(id),

            // ---- Literal punctuation ----
            Kind::BracketLeft => self.out.push('['),
            Kind::BracketImageLeft => self.out.push_str("!["),
            Kind::BracketFootnoteLeft => self.out.push_str("[^"),
            Kind::BracketCitationLeft => self.out.push_str("[#"),
            Kind::BracketGlossaryLeft => self.out.push_str("[?"),
            Kind::BracketVariableLeft => self.out.push_str("[%"),
            Kind::BracketRight => self.out.push(']'),
            Kind::BraceDoubleLeft => self.out.push_str("{{"),
            Kind::BraceDoubleRight => self.out.push_str("}}"),
            Kind::ParenLeft => self.out.push('('),
            Kind::ParenRight => self.out.push(')'),
            Kind::Colon => self.out.push(':'),
            Kind::Equal => self.out.push('='),

            // ---- Text ----
            Kind::Pipe
            | Kind::Plus
            | Kind::Slash
            | Kind::Star
            | Kind::Underscore
            | Kind::Hash(_)
            | Kind::TextPlain
            | Kind::TextBackslash
            | Kind::TextBraceLeft
            | Kind::TextBraceRight
            | Kind::TextHash
            | Kind::TextNumberPossList
            | Kind::TextPercent
            | Kind::TextPeriod
            | Kind::TocText => push_escaped(&mut self.out, doc.node_text(id)),

            Kind::Unknown(code) => {
                let context = doc.node_text(id).to_string();
                warn!(node = id.0, code, context = %context, "unknown token kind");
                self.state.diagnostics.push(Diagnostic {
                    node: id,
                    code,
                    context,
                });
            }
        }

        0
    }

    pub(super) fn glyph(&mut self, glyph: Glyph) {
        self.out
            .push_str(glyph.html(self.state.options.quote_language));
    }

    fn smart(&mut self, id: NodeId, glyph: Glyph) {
        if self.state.options.smart {
            self.glyph(glyph);
        } else {
            push_escaped(&mut self.out, self.doc.node_text(id));
        }
    }

    /// Emphasis or strong delimiter; literal source when unmatched.
    fn emphasis(&mut self, id: NodeId, tag: &str) {
        if self.doc.mate(id).is_some() {
            self.out.push_str(tag);
        } else {
            push_escaped(&mut self.out, self.doc.node_text(id));
        }
    }

    fn backtick(&mut self, id: NodeId) {
        let doc = self.doc;
        match doc.mate(id) {
            None => self.out.push_str(doc.node_text(id)),
            Some(mate) if doc.kind(mate) == Kind::QuoteRightAlt => {
                if self.state.options.smart {
                    self.glyph(Glyph::LeftDouble);
                } else {
                    self.out.push_str(doc.node_text(id));
                }
            }
            Some(_) => {
                if doc.opens_pair(id) == Some(true) {
                    self.out.push_str("<code>");
                } else {
                    self.out.push_str("</code>");
                }
            }
        }
    }

    /// Subscript or superscript delimiter.
    fn script(&mut self, id: NodeId, tag: &str, literal: char) {
        let doc = self.doc;
        match doc.opens_pair(id) {
            Some(true) => {
                self.out.push('<');
                self.out.push_str(tag);
                self.out.push('>');
            }
            Some(false) => {
                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push('>');
            }
            None if doc.node(id).is_some_and(|n| n.span.len != 1) => {
                self.out.push('<');
                self.out.push_str(tag);
                self.out.push('>');
                self.render_children(id);
                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push('>');
            }
            None => self.out.push(literal),
        }
    }

    fn math_delimiter(&mut self, id: NodeId, paired: &str, literal: &str) {
        if self.doc.mate(id).is_some() {
            self.out.push_str(paired);
        } else {
            self.out.push_str(literal);
        }
    }

    fn escaped_character(&mut self, id: NodeId) {
        let text = self.doc.node_text(id);
        match text.get(1..) {
            Some(rest) if rest.starts_with(' ') && !self.state.options.compatibility => {
                self.out.push_str("&nbsp;");
            }
            Some(rest) if !rest.is_empty() => push_escaped(&mut self.out, rest),
            _ => push_escaped(&mut self.out, text),
        }
    }
}
