//! Token tree node types and kinds.

/// Unique identifier for a node within a [`Document`](super::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Token category of a node.
///
/// The set is closed: every kind the parser produces has a variant here,
/// and the renderer matches on it exhaustively. `Unknown` carries the raw
/// token code of anything a newer parser emits that this crate does not
/// know about; the renderer reports it and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Kind {
    // ---- Blocks ----
    /// Document root.
    DocStart,
    Paragraph,
    /// ATX heading, level 1-6.
    Heading(u8),
    /// Setext heading, level 1 or 2.
    SetextHeading(u8),
    Blockquote,
    CodeFenced,
    CodeIndented,
    ListBulleted,
    ListBulletedLoose,
    ListEnumerated,
    ListEnumeratedLoose,
    /// List item whose content is block-level (paragraphs already present).
    ListItem,
    /// List item whose content is bare inline text.
    ListItemTight,
    DefinitionList,
    DefinitionTerm,
    Definition,
    Table,
    TableHeader,
    TableSection,
    TableRow,
    TableCell,
    /// Cell divider; its length is the column span of the preceding cell.
    TableDivider,
    HorizontalRule,
    HtmlBlock,
    TocPlaceholder,
    /// Consumed or stripped content; renders nothing.
    #[default]
    Empty,
    Meta,
    DefFootnote,
    DefCitation,
    DefGlossary,
    LineListBulleted,
    LineListEnumerated,

    // ---- Inline delimiters ----
    EmphStart,
    EmphStop,
    StrongStart,
    StrongStop,
    Subscript,
    Superscript,
    QuoteSingle,
    QuoteDouble,
    /// Closing `''` of a ``` ``text'' ``` quote.
    QuoteRightAlt,
    Backtick,
    Apostrophe,
    DashN,
    DashM,
    Ellipsis,
    EscapedCharacter,
    Ampersand,
    /// `&` that starts an entity-like run (`&amp;` in source).
    AmpersandLong,
    AngleLeft,
    AngleRight,
    MathBracketOpen,
    MathBracketClose,
    MathParenOpen,
    MathParenClose,
    MathDollarSingle,
    MathDollarDouble,

    // ---- CriticMarkup delimiters ----
    CriticAddOpen,
    CriticAddClose,
    CriticDelOpen,
    CriticDelClose,
    CriticComOpen,
    CriticComClose,
    CriticHiOpen,
    CriticHiClose,
    CriticSubOpen,
    CriticSubDiv,
    CriticSubClose,
    /// `~` half of a split `~>` divider.
    CriticSubDivA,
    /// `>` half of a split `~>` divider.
    CriticSubDivB,

    // ---- Pairs (container nodes whose first/last child are the delimiters) ----
    PairBacktick,
    PairAngle,
    PairBraces,
    PairBracket,
    PairBracketImage,
    PairBracketFootnote,
    PairBracketCitation,
    PairBracketGlossary,
    PairBracketVariable,
    PairCriticAdd,
    PairCriticDel,
    PairCriticCom,
    PairCriticHi,
    PairCriticSubDel,
    PairCriticSubAdd,
    PairMath,
    PairParen,
    PairQuoteSingle,
    PairQuoteDouble,
    PairStar,
    PairUnderscore,

    // ---- Bracket delimiters ----
    BracketLeft,
    BracketImageLeft,
    BracketFootnoteLeft,
    BracketCitationLeft,
    BracketGlossaryLeft,
    BracketVariableLeft,
    BracketRight,

    // ---- Punctuation ----
    BraceDoubleLeft,
    BraceDoubleRight,
    ParenLeft,
    ParenRight,
    Colon,
    Equal,
    Pipe,
    Plus,
    Slash,
    Star,
    Underscore,
    /// Run of `#` characters (1-6) that did not start a heading.
    Hash(u8),

    // ---- Markers (structural, never printed) ----
    MarkerBlockquote,
    MarkerHeading,
    MarkerListBullet,
    MarkerListEnumerator,

    // ---- Whitespace ----
    IndentSpace,
    IndentTab,
    NonIndentSpace,
    TextNewline,
    TextLinebreak,

    // ---- Text ----
    TextPlain,
    TextBackslash,
    TextBraceLeft,
    TextBraceRight,
    TextHash,
    TextNumberPossList,
    TextPercent,
    TextPeriod,
    /// Literal `{{TOC}}` text outside of a placeholder block.
    TocText,
    CodeFence,
    /// `[label]` attached to a heading.
    ManualLabel,

    /// Token code this renderer does not recognize.
    Unknown(u16),
}

impl Kind {
    /// Heading level for ATX and setext headings.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Kind::Heading(level) | Kind::SetextHeading(level) => Some(level),
            _ => None,
        }
    }

    /// Paragraph-like blocks that receive a note back-reference link.
    pub fn is_paragraph(self) -> bool {
        matches!(
            self,
            Kind::Paragraph | Kind::DefFootnote | Kind::DefCitation | Kind::DefGlossary
        )
    }

    /// Whitespace-only tokens (stripped at the edges of code spans).
    pub fn is_whitespace(self) -> bool {
        matches!(
            self,
            Kind::TextNewline | Kind::IndentTab | Kind::IndentSpace | Kind::NonIndentSpace
        )
    }

    /// Block-level container kinds.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Kind::DocStart
                | Kind::Paragraph
                | Kind::Heading(_)
                | Kind::SetextHeading(_)
                | Kind::Blockquote
                | Kind::CodeFenced
                | Kind::CodeIndented
                | Kind::ListBulleted
                | Kind::ListBulletedLoose
                | Kind::ListEnumerated
                | Kind::ListEnumeratedLoose
                | Kind::ListItem
                | Kind::ListItemTight
                | Kind::DefinitionList
                | Kind::DefinitionTerm
                | Kind::Definition
                | Kind::Table
                | Kind::TableHeader
                | Kind::TableSection
                | Kind::HorizontalRule
                | Kind::HtmlBlock
                | Kind::TocPlaceholder
                | Kind::DefFootnote
                | Kind::DefCitation
                | Kind::DefGlossary
        )
    }
}

/// Byte range into the document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset into `Document::source`.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset, saturating at `u32::MAX`.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.len)
    }

    /// Get the end offset, or `None` if it overflows.
    pub fn checked_end(&self) -> Option<u32> {
        self.start.checked_add(self.len)
    }
}

/// A node in the token tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Token category.
    pub kind: Kind,
    /// Source range covered by this token (including its children).
    pub span: Span,
    /// Parent node (None for root).
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node.
    pub last_child: Option<NodeId>,
    /// Previous sibling node.
    pub prev_sibling: Option<NodeId>,
    /// Next sibling node.
    pub next_sibling: Option<NodeId>,
    /// Matching delimiter (opener <-> closer), if the parser paired it.
    pub mate: Option<NodeId>,
}

impl Node {
    /// Create a new node with the given kind and span.
    pub fn new(kind: Kind, span: Span) -> Self {
        Self {
            kind,
            span,
            ..Default::default()
        }
    }
}
