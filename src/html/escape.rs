//! HTML escaping, address obfuscation and smart-typography glyphs.

use std::fmt::Write as _;
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::Error;

/// Characters percent-encoded inside `href` / `src` values.
const URL_UNSAFE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Append `text` with `"`, `&`, `<` and `>` replaced by named entities.
pub fn push_escaped(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    if memchr::memchr3(b'&', b'<', b'>', bytes).is_none() && memchr::memchr(b'"', bytes).is_none()
    {
        out.push_str(text);
        return;
    }

    let mut offset = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let entity = match byte {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => continue,
        };
        out.push_str(&text[offset..i]);
        out.push_str(entity);
        offset = i + 1;
    }
    out.push_str(&text[offset..]);
}

/// Escape `text` into a new string.
///
/// # Examples
///
/// ```
/// use mmd_html::html::escape_html;
///
/// assert_eq!(escape_html("a & b"), "a &amp; b");
/// assert_eq!(escape_html("<\"x\">"), "&lt;&quot;x&quot;&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut out, text);
    out
}

/// Append a URL for use in an attribute value.
///
/// Spaces and control characters are percent-encoded, then the result is
/// HTML-escaped.
pub fn push_url(out: &mut String, url: &str) {
    let encoded = utf8_percent_encode(url, URL_UNSAFE).to_string();
    push_escaped(out, &encoded);
}

/// Deterministic pseudo-random source for address obfuscation.
///
/// A 64-bit linear congruential generator (Knuth's MMIX constants). One
/// instance lives in each render state, so a given seed always produces
/// the same output for the same document.
#[derive(Debug, Clone)]
pub struct Obfuscator {
    state: u64,
}

impl Obfuscator {
    pub const DEFAULT_SEED: u64 = 0x2545_f491_4f6c_dd1d;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance and return the next value.
    pub fn next_value(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state >> 33
    }

    /// Append `text` escaped, encoding every other ASCII character as a
    /// decimal or hexadecimal character reference.
    pub fn push_obfuscated(&mut self, out: &mut String, text: &str) {
        for c in text.chars() {
            match c {
                '"' => out.push_str("&quot;"),
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                c if c.is_ascii() => {
                    let _ = if self.next_value() % 2 == 0 {
                        write!(out, "&#{};", c as u32)
                    } else {
                        write!(out, "&#x{:x};", c as u32)
                    };
                }
                c => out.push(c),
            }
        }
    }
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Quotation conventions for smart typography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteLanguage {
    #[default]
    English,
    Dutch,
    French,
    German,
    GermanGuillemets,
    Swedish,
}

impl FromStr for QuoteLanguage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "english" | "en" => Ok(QuoteLanguage::English),
            "dutch" | "nl" => Ok(QuoteLanguage::Dutch),
            "french" | "fr" => Ok(QuoteLanguage::French),
            "german" | "de" => Ok(QuoteLanguage::German),
            "germanguillemets" => Ok(QuoteLanguage::GermanGuillemets),
            "swedish" | "sv" => Ok(QuoteLanguage::Swedish),
            _ => Err(Error::UnknownValue(format!("quote language `{s}`"))),
        }
    }
}

/// Typographic substitutions made under smart typography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Apostrophe,
    EnDash,
    EmDash,
    Ellipsis,
    LeftSingle,
    RightSingle,
    LeftDouble,
    RightDouble,
}

impl Glyph {
    /// Character reference for this glyph in the given language.
    pub fn html(self, lang: QuoteLanguage) -> &'static str {
        use QuoteLanguage::*;

        match self {
            Glyph::Apostrophe => "&#8217;",
            Glyph::EnDash => "&#8211;",
            Glyph::EmDash => "&#8212;",
            Glyph::Ellipsis => "&#8230;",
            Glyph::LeftSingle => match lang {
                Swedish => "&#8217;",
                French => "&#39;",
                German => "&#8218;",
                GermanGuillemets => "&#8250;",
                English | Dutch => "&#8216;",
            },
            Glyph::RightSingle => match lang {
                German => "&#8216;",
                GermanGuillemets => "&#8249;",
                English | Dutch | French | Swedish => "&#8217;",
            },
            Glyph::LeftDouble => match lang {
                Dutch | German => "&#8222;",
                GermanGuillemets => "&#187;",
                French => "&#171;",
                Swedish => "&#8221;",
                English => "&#8220;",
            },
            Glyph::RightDouble => match lang {
                German => "&#8220;",
                GermanGuillemets => "&#171;",
                French => "&#187;",
                English | Dutch | Swedish => "&#8221;",
            },
        }
    }
}
