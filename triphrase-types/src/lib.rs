//! Core types for the triphrase phrase counter.
//!
//! This crate provides the value types that are shared across the
//! triphrase workspace. Keeping types separate ensures:
//!
//! - **Cross-crate compatibility**: Core and CLI share the same types
//! - **Clean boundaries**: No circular dependencies between crates
//! - **Cheap values**: Phrases and ranked entries borrow, they never own text

#![warn(missing_docs)]

use core::cmp::Ordering;
use core::fmt;

use thiserror::Error;

/// Document identifier.
///
/// Assigned in submission order by the caller of the fan-out coordinator.
/// Completion order is unrelated to identifier order.
pub type DocId = u32;

/// Number of tokens in a phrase.
pub const PHRASE_LEN: usize = 3;

/// Three consecutive tokens of one document.
///
/// A phrase borrows its tokens from the normalized text it was cut from.
/// Its canonical form is the three tokens joined by exactly one space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phrase<'a>([&'a str; PHRASE_LEN]);

impl<'a> Phrase<'a> {
    /// Creates a phrase from three tokens.
    #[inline(always)]
    pub const fn new(first: &'a str, second: &'a str, third: &'a str) -> Self {
        Self([first, second, third])
    }

    /// Creates a phrase from a window of exactly three tokens.
    /// Returns `None` for any other window length.
    #[inline(always)]
    pub fn from_window(window: &[&'a str]) -> Option<Self> {
        match *window {
            [a, b, c] => Some(Self::new(a, b, c)),
            _ => None,
        }
    }

    /// Returns the three tokens in document order.
    #[inline(always)]
    pub const fn tokens(&self) -> [&'a str; PHRASE_LEN] {
        self.0
    }

    /// Byte length of the canonical form (tokens plus two separators).
    #[inline(always)]
    pub fn canonical_len(&self) -> usize {
        self.0[0].len() + self.0[1].len() + self.0[2].len() + (PHRASE_LEN - 1)
    }

    /// Writes the canonical form into `buf`, replacing its contents.
    ///
    /// Reuses the buffer's capacity; the caller owns the buffer across calls.
    #[inline]
    pub fn write_into(&self, buf: &mut String) {
        buf.clear();
        buf.reserve(self.canonical_len());
        buf.push_str(self.0[0]);
        buf.push(' ');
        buf.push_str(self.0[1]);
        buf.push(' ');
        buf.push_str(self.0[2]);
    }
}

impl fmt::Display for Phrase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0[0], self.0[1], self.0[2])
    }
}

/// One line of a ranked report.
///
/// Entries are ordered by count (higher = greater), then by phrase in
/// reverse byte order, so that for equal counts the lexicographically
/// smaller phrase is the greater entry. Sorting descending therefore yields
/// the final report order. `rank` does not take part in comparisons.
#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'t> {
    /// Canonical phrase text, borrowed from the frequency table
    pub phrase: &'t str,
    /// Number of occurrences in the document
    pub count: u32,
    /// 1-based position in the report
    pub rank: u32,
}

impl<'t> RankedEntry<'t> {
    /// Creates a new ranked entry.
    #[inline(always)]
    pub const fn new(phrase: &'t str, count: u32, rank: u32) -> Self {
        Self {
            phrase,
            count,
            rank,
        }
    }
}

impl PartialEq for RankedEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.phrase == other.phrase
    }
}

impl Eq for RankedEntry<'_> {}

impl PartialOrd for RankedEntry<'_> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedEntry<'_> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        // Primary: count. Secondary: phrase, reversed (smaller text ranks first).
        match self.count.cmp(&other.count) {
            Ordering::Equal => other.phrase.cmp(self.phrase),
            ord => ord,
        }
    }
}

impl fmt::Display for RankedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.rank, self.phrase, self.count)
    }
}

/// Which characters count as part of a word.
///
/// Everything else is a separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordPolicy {
    /// Letters and digits only.
    Alnum,
    /// Letters, digits, apostrophe and hyphen, so that `don't` and
    /// `well-known` stay single tokens.
    #[default]
    AlnumApostropheHyphen,
}

impl WordPolicy {
    /// Returns `true` if `c` is a word character under this policy.
    #[inline(always)]
    pub fn is_word_char(self, c: char) -> bool {
        if c.is_ascii() {
            return self.is_word_byte(c as u8);
        }
        c.is_alphanumeric()
    }

    /// ASCII fast path of [`WordPolicy::is_word_char`].
    ///
    /// Bytes >= 0x80 are never word bytes on their own.
    #[inline(always)]
    pub const fn is_word_byte(self, b: u8) -> bool {
        match self {
            WordPolicy::Alnum => b.is_ascii_alphanumeric(),
            WordPolicy::AlnumApostropheHyphen => {
                b.is_ascii_alphanumeric() || b == b'\'' || b == b'-'
            }
        }
    }
}

/// Phrase counter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterConfig {
    /// Word character policy used by the normalizer.
    pub word_policy: WordPolicy,
    /// Documents larger than this many bytes are rejected.
    /// `None` accepts any size.
    pub max_document_bytes: Option<usize>,
}

impl CounterConfig {
    /// Letters and digits only, no size ceiling.
    pub const fn strict_words() -> Self {
        Self {
            word_policy: WordPolicy::Alnum,
            max_document_bytes: None,
        }
    }

    /// Default word policy with a document size ceiling.
    pub const fn with_max_bytes(max_document_bytes: usize) -> Self {
        Self {
            word_policy: WordPolicy::AlnumApostropheHyphen,
            max_document_bytes: Some(max_document_bytes),
        }
    }
}

/// Errors raised while counting the phrases of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CountError {
    /// Document exceeds the configured size ceiling.
    #[error("document too large: {size} bytes (max: {max_size} bytes)")]
    TooLarge {
        /// The actual size of the document in bytes.
        size: usize,
        /// The configured maximum in bytes.
        max_size: usize,
    },
}
