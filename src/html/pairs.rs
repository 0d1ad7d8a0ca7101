//! Paired constructs: brackets, notes, CriticMarkup, code spans and
//! autolinks.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::references::Link;
use crate::tree::{Kind, NodeId, label_from_str};

use super::Renderer;
use super::escape::{push_escaped, push_url};
use super::state::NoteKind;

impl<'a> Renderer<'a> {
    /// Mark a pair's delimiter children as consumed.
    pub(super) fn consume_delimiters(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(open) = doc.first_child(id) else {
            return;
        };
        self.state.consume(open);
        let close = doc.mate(open).or_else(|| doc.node(id).and_then(|n| n.last_child));
        if let Some(close) = close {
            self.state.consume(close);
        }
    }

    /// Look up the link target of a bracket.
    ///
    /// Returns the link and how many following siblings the reference
    /// syntax used: `[text](url)` and `[text][ref]` use one, the shortcut
    /// `[ref]` none.
    fn resolve_link(&self, id: NodeId) -> Option<(Cow<'a, Link>, usize)> {
        let doc = self.doc;
        let refs = self.refs;
        let next = doc.next_sibling(id);

        match next.map(|n| (n, doc.kind(n))) {
            Some((paren, Kind::PairParen)) => {
                parse_inline_link(doc.inner_text(paren)).map(|link| (Cow::Owned(link), 1))
            }
            Some((reference, Kind::PairBracket)) => {
                let label = doc.inner_text(reference);
                let label = if label.trim().is_empty() {
                    doc.inner_text(id)
                } else {
                    label
                };
                refs.link(label).map(|link| (Cow::Borrowed(link), 1))
            }
            _ => refs
                .link(doc.inner_text(id))
                .map(|link| (Cow::Borrowed(link), 0)),
        }
    }

    /// `[..]` and `![..]`.
    pub(super) fn bracket(&mut self, id: NodeId) -> usize {
        let doc = self.doc;
        let kind = doc.kind(id);

        if kind == Kind::PairBracket
            && self.state.options.notes
            && doc.next_kind(id) == Some(Kind::PairBracketCitation)
        {
            return self.citation(id);
        }

        let Some((link, consumed)) = self.resolve_link(id) else {
            self.render_children(id);
            return 0;
        };

        self.consume_delimiters(id);
        if kind == Kind::PairBracket {
            self.link(id, &link);
        } else {
            let figure = doc.prev_sibling(id).is_none() && self.only_trailing_breaks(id, consumed);
            self.image(id, &link, figure);
        }
        consumed
    }

    /// Whether nothing but an optional newline and line break follows the
    /// `consumed` siblings after `id`.
    fn only_trailing_breaks(&self, id: NodeId, consumed: usize) -> bool {
        let doc = self.doc;
        let mut next = doc.next_sibling(id);
        for _ in 0..consumed {
            next = next.and_then(|n| doc.next_sibling(n));
        }
        if let Some(n) = next
            && doc.kind(n) == Kind::TextNewline
        {
            next = doc.next_sibling(n);
        }
        if let Some(n) = next
            && doc.kind(n) == Kind::TextLinebreak
        {
            next = doc.next_sibling(n);
        }
        next.is_none()
    }

    fn push_link_attributes(&mut self, link: &Link) {
        if let Some(title) = link.title.as_deref().filter(|t| !t.is_empty()) {
            self.out.push_str(" title=\"");
            push_escaped(&mut self.out, title);
            self.out.push('"');
        }
        for (key, value) in &link.attributes {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            push_escaped(&mut self.out, value);
            self.out.push('"');
        }
    }

    fn link(&mut self, id: NodeId, link: &Link) {
        self.out.push_str("<a href=\"");
        push_url(&mut self.out, &link.url);
        self.out.push('"');
        self.push_link_attributes(link);
        self.out.push('>');
        self.render_children(id);
        self.out.push_str("</a>");
    }

    fn image(&mut self, id: NodeId, link: &Link, figure: bool) {
        let compat = self.state.options.compatibility;
        // A figure replaces the `<p>` its paragraph just opened.
        let replaced = self
            .state
            .open_para
            .filter(|p| figure && !compat && self.doc.parent(id) == Some(p.block));
        let figure = replaced.is_some();

        if let Some(para) = replaced {
            self.out.truncate(para.at);
            self.state.open_para = None;
            self.out.push_str("<figure>\n");
            self.state.close_para = false;
        }

        self.out.push_str("<img src=\"");
        push_url(&mut self.out, &link.url);
        self.out.push_str("\" alt=\"");
        self.render_raw_siblings(self.doc.first_child(id));
        self.out.push('"');

        if let Some(label) = link.label.as_deref().filter(|_| !compat) {
            self.out.push_str(" id=\"");
            push_escaped(&mut self.out, label);
            self.out.push('"');
        }

        self.push_link_attributes(link);
        self.out.push_str(" />");

        if figure {
            self.out.push_str("\n<figcaption>");
            self.render_children(id);
            self.out.push_str("</figcaption>\n</figure>");
        }
    }

    /// Emit the in-text anchor of a note reference.
    fn note_anchor(&mut self, kind: NoteKind, index: usize, is_new: bool) {
        let prefix = kind.prefix();
        let _ = write!(self.out, "<a href=\"#{prefix}:{index}\"");
        if is_new {
            let _ = write!(self.out, " id=\"{prefix}ref:{index}\"");
        }
        let _ = write!(
            self.out,
            " title=\"{}\" class=\"{}\">",
            kind.title(),
            kind.class()
        );
    }

    /// `[^label]`.
    pub(super) fn footnote(&mut self, id: NodeId) {
        let doc = self.doc;
        let refs = self.refs;
        if !self.state.options.notes {
            self.render_children(id);
            return;
        }

        let Some(note) = refs.footnote(doc.inner_text(id)) else {
            self.render_children(id);
            return;
        };

        let (index, is_new) = self.state.footnotes.register(note);
        self.note_anchor(NoteKind::Footnote, index, is_new);
        let _ = write!(self.out, "[{index}]</a>");
    }

    /// `[#label]`, optionally preceded by a `[locator]` bracket.
    ///
    /// `id` is either the citation itself or the locator; in the latter
    /// case the citation sibling is consumed.
    pub(super) fn citation(&mut self, id: NodeId) -> usize {
        let doc = self.doc;
        let refs = self.refs;

        let (citation, locator) = if doc.kind(id) == Kind::PairBracket {
            match doc.next_sibling(id) {
                Some(next) => (next, Some(id)),
                None => {
                    self.render_children(id);
                    return 0;
                }
            }
        } else {
            (id, None)
        };
        let consumed = usize::from(locator.is_some());

        if !self.state.options.notes {
            if let Some(locator) = locator {
                self.render_children(locator);
            }
            self.render_children(citation);
            return consumed;
        }

        let Some(note) = refs.citation(doc.inner_text(citation)) else {
            if let Some(locator) = locator {
                self.render_children(locator);
            }
            self.render_children(citation);
            return consumed;
        };

        let mut visible = true;
        let mut locator_text = "";
        if let Some(locator) = locator {
            let text = doc.inner_text(locator);
            if label_from_str(text) == "notcited" {
                visible = false;
            } else {
                locator_text = text;
            }
        }

        let (index, is_new) = self.state.citations.register(note);
        if visible {
            self.note_anchor(NoteKind::Citation, index, is_new);
            self.out.push('[');
            if !locator_text.is_empty() {
                push_escaped(&mut self.out, locator_text);
                self.out.push_str(", ");
            }
            let _ = write!(self.out, "{index}]</a>");
        }
        consumed
    }

    /// `[?term]`.
    pub(super) fn glossary(&mut self, id: NodeId) {
        let doc = self.doc;
        let refs = self.refs;
        if !self.state.options.notes {
            self.render_children(id);
            return;
        }

        let Some(note) = refs.glossary(doc.inner_text(id)) else {
            self.render_children(id);
            return;
        };

        let (index, is_new) = self.state.glossary.register(note);
        self.note_anchor(NoteKind::Glossary, index, is_new);
        push_escaped(&mut self.out, &note.term);
        self.out.push_str("</a>");
    }

    /// `[%key]`: a metadata value.
    pub(super) fn variable(&mut self, id: NodeId) {
        let meta = self.meta;
        match meta.get(self.doc.inner_text(id)) {
            Some(value) => push_escaped(&mut self.out, value),
            None => self.render_children(id),
        }
    }

    pub(super) fn critic(&mut self, id: NodeId, kind: Kind) {
        let doc = self.doc;
        let options = &self.state.options;
        let (critic, accept, reject) = (options.critic, options.critic_accept, options.critic_reject);

        let wrap = match kind {
            Kind::PairCriticAdd if reject => return,
            Kind::PairCriticAdd if critic => (!accept).then_some(("<ins>", "</ins>")),
            Kind::PairCriticDel if accept => return,
            Kind::PairCriticDel if critic => (!reject).then_some(("<del>", "</del>")),
            Kind::PairCriticCom | Kind::PairCriticHi if accept || reject => return,
            Kind::PairCriticCom if critic => Some(("<span class=\"critic comment\">", "</span>")),
            Kind::PairCriticHi if critic => Some(("<mark>", "</mark>")),
            Kind::PairCriticSubDel
                if critic && doc.next_kind(id) == Some(Kind::PairCriticSubAdd) =>
            {
                if accept {
                    self.consume_delimiters(id);
                    return;
                }
                (!reject).then_some(("<del>", "</del>"))
            }
            Kind::PairCriticSubAdd
                if critic && doc.prev_kind(id) == Some(Kind::PairCriticSubDel) =>
            {
                if reject {
                    self.consume_delimiters(id);
                    return;
                }
                (!accept).then_some(("<ins>", "</ins>"))
            }
            _ => {
                self.render_children(id);
                return;
            }
        };

        self.consume_delimiters(id);
        match wrap {
            Some((open, close)) => {
                self.out.push_str(open);
                self.render_children(id);
                self.out.push_str(close);
            }
            None => self.render_children(id),
        }
    }

    /// `` `code` ``: raw interior with one layer of edge whitespace removed.
    pub(super) fn code_span(&mut self, id: NodeId) {
        let doc = self.doc;
        let Some(open) = doc.first_child(id) else {
            return;
        };
        let Some(close) = doc.mate(open).or_else(|| doc.node(id).and_then(|n| n.last_child))
        else {
            self.render_children(id);
            return;
        };
        if close == open {
            self.render_children(id);
            return;
        }

        let interior: Vec<NodeId> = doc
            .siblings(doc.next_sibling(open))
            .take_while(|&n| n != close)
            .collect();

        self.out.push_str("<code>");
        let last = interior.len().saturating_sub(1);
        for (i, &node) in interior.iter().enumerate() {
            if self.state.is_consumed(node) {
                continue;
            }
            let at_start = i == 0;
            let at_end = i == last;
            let kind = doc.kind(node);

            if (at_start || at_end) && kind.is_whitespace() {
                continue;
            }
            if (at_start || at_end) && kind == Kind::TextPlain {
                let mut text = doc.node_text(node);
                if at_start {
                    text = text.trim_start();
                }
                if at_end {
                    text = text.trim_end();
                }
                push_escaped(&mut self.out, text);
                continue;
            }
            self.render_raw_node(node);
        }
        self.out.push_str("</code>");
    }

    /// `<...>`: autolink, inline HTML or plain text.
    pub(super) fn angle(&mut self, id: NodeId) {
        let doc = self.doc;
        let text = doc.node_text(id);
        let inner = text
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .unwrap_or("");

        if is_url(inner) {
            self.out.push_str("<a href=\"");
            push_url(&mut self.out, inner);
            self.out.push_str("\">");
            push_escaped(&mut self.out, inner);
            self.out.push_str("</a>");
        } else if is_email(inner) {
            let address = inner.strip_prefix("mailto:").unwrap_or(inner);
            self.out.push_str("<a href=\"");
            self.state.rng.push_obfuscated(&mut self.out, "mailto:");
            self.state.rng.push_obfuscated(&mut self.out, address);
            self.out.push_str("\">");
            self.state.rng.push_obfuscated(&mut self.out, address);
            self.out.push_str("</a>");
        } else if is_html_tag(inner) {
            self.out.push_str(text);
        } else {
            self.render_children(id);
        }
    }
}

/// Parse the interior of `(url "title")`.
fn parse_inline_link(text: &str) -> Option<Link> {
    let text = text.trim();
    let (url, rest) = if let Some(stripped) = text.strip_prefix('<') {
        let end = stripped.find('>')?;
        (&stripped[..end], &stripped[end + 1..])
    } else {
        match text.find(char::is_whitespace) {
            Some(end) => (&text[..end], &text[end..]),
            None => (text, ""),
        }
    };

    let mut link = Link::new(url);
    let rest = rest.trim();
    if let Some(quote) = rest.chars().next().filter(|c| matches!(c, '"' | '\''))
        && let Some(end) = rest[1..].rfind(quote)
    {
        link.title = Some(rest[1..1 + end].to_string());
    }
    Some(link)
}

/// `scheme:rest` with a registered-looking scheme and no whitespace.
fn is_url(text: &str) -> bool {
    let Some((scheme, rest)) = text.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        && scheme.len() >= 2
        && !scheme.eq_ignore_ascii_case("mailto");
    scheme_ok && !rest.is_empty() && !text.contains(char::is_whitespace)
}

/// `local@domain.tld`, optionally prefixed with `mailto:`.
fn is_email(text: &str) -> bool {
    let address = text.strip_prefix("mailto:").unwrap_or(text);
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.contains(char::is_whitespace)
        && !domain.contains('@')
}

/// Opening, closing or self-closing tag, comment or processing instruction.
fn is_html_tag(inner: &str) -> bool {
    if inner.starts_with("!--") || inner.starts_with('?') || inner.starts_with('!') {
        return true;
    }
    let name = inner.strip_prefix('/').unwrap_or(inner);
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}
