//! Text ↔ Morse conversion
//!
//! Encoded documents join one token per input character with single spaces.
//! The space character itself encodes to the `/` token, so a single space
//! between words produces the `" / "` sequence that [`decode`] splits on.
//! Runs of spaces produce adjacent `/` tokens; those decode back to spaces
//! through the reverse table rather than as word boundaries.

/// Symbol table and reverse lookups
pub mod table;

pub use table::{char_for, symbol_for, WORD_SYMBOL};

/// Placeholder for characters and tokens without a mapping
pub const SENTINEL: char = '?';

/// Word separator expected by [`decode`]
pub const WORD_SEPARATOR: &str = " / ";

/// One encoded input character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedToken {
    /// Character found in the symbol table
    Symbol(&'static str),
    /// Character without a symbol
    Unsupported(char),
}

impl EncodedToken {
    /// Wire form of the token (`?` for unsupported characters)
    pub const fn as_wire(&self) -> &'static str {
        match self {
            Self::Symbol(symbol) => *symbol,
            Self::Unsupported(_) => "?",
        }
    }
}

/// One decoded token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedChar {
    /// Token found in the reverse table
    Char(char),
    /// Token without a character
    Unrecognized(String),
}

impl DecodedChar {
    /// Text form of the token (`?` for unrecognized tokens)
    pub const fn as_char(&self) -> char {
        match self {
            Self::Char(c) => *c,
            Self::Unrecognized(_) => SENTINEL,
        }
    }
}

/// Tokens of one word, in order
pub type DecodedWord = Vec<DecodedChar>;

/// Summary of an encoding pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeReport {
    /// Characters that had a symbol
    pub encoded: usize,
    /// Characters replaced by the sentinel, in input order
    pub unsupported: Vec<char>,
}

impl EncodeReport {
    /// True when every character had a symbol
    pub fn is_clean(&self) -> bool {
        self.unsupported.is_empty()
    }
}

/// Encode text into per-character tokens without collapsing failures
pub fn encode_tokens(text: &str) -> impl Iterator<Item = EncodedToken> + '_ {
    text.chars().map(|c| {
        symbol_for(c).map_or(EncodedToken::Unsupported(c), EncodedToken::Symbol)
    })
}

/// Encode text as a Morse document
///
/// Unsupported characters become the `?` token. Never fails.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 5);
    for (i, token) in encode_tokens(text).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(token.as_wire());
    }
    out
}

/// Count encoded and unsupported characters in `text`
pub fn report(text: &str) -> EncodeReport {
    encode_tokens(text).fold(EncodeReport::default(), |mut report, token| {
        match token {
            EncodedToken::Symbol(_) => report.encoded += 1,
            EncodedToken::Unsupported(c) => report.unsupported.push(c),
        }
        report
    })
}

/// Decode a Morse document into words of tokens without collapsing failures
///
/// The document is trimmed, split on `" / "` into words, and each word is
/// split on whitespace into tokens.
pub fn decode_words(doc: &str) -> Vec<DecodedWord> {
    doc.trim()
        .split(WORD_SEPARATOR)
        .map(|word| {
            word.split_whitespace()
                .map(|token| {
                    char_for(token)
                        .map_or_else(|| DecodedChar::Unrecognized(token.to_owned()), DecodedChar::Char)
                })
                .collect()
        })
        .collect()
}

/// Decode a Morse document into uppercase text
///
/// Unrecognized tokens become `?`. Words are joined with a single space.
/// Never fails; malformed input decodes best-effort.
pub fn decode(doc: &str) -> String {
    let words = decode_words(doc);
    let mut out = String::with_capacity(doc.len() / 2);
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(word.iter().map(DecodedChar::as_char));
    }
    out
}
