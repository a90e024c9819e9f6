//! Streaming Tokenizer Module
//!
//! Splits normalized text into word tokens. It's the second stage in the
//! phrase pipeline, taking text the normalizer has already folded and
//! cleaned, and breaking it into the word stream the phrase window slides over.
//!
//! ## What It Does
//!
//! Given normalized input like `" the cat sat "`, it emits each word with its
//! position in the word stream:
//!
//! ```ignore
//! ("the", 0)
//! ("cat", 1)
//! ("sat", 2)
//! ```
//!
//! ## Key Features
//!
//! - **Zero Allocation**: Tokens are slices of the normalized string
//! - **Streaming**: `tokenize` emits through a callback; `tokens` collects
//! - **Fast**: `memchr` scan for the ASCII space separator
//!
//! ## The Input Contract
//!
//! The tokenizer expects **normalized** input: the only separator byte is the
//! ASCII space. Runs of spaces and spaces at either end are tolerated and
//! never produce empty tokens.

use memchr::memchr_iter;

/// Streaming tokenizer - splits normalized text into tokens.
///
/// ## Example
///
/// ```
/// use triphrase_core::analyzer::tokenizer::Tokenizer;
///
/// let mut count = 0;
/// Tokenizer::new().tokenize(" hello world foo ", |_text, _pos| {
///     count += 1;
/// });
///
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits `(text, position)`.
    ///
    /// Positions count emitted tokens from 0. After emitting a token at
    /// position `u32::MAX`, further emissions stop (overflow protection).
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            !bytes.iter().any(|&b| matches!(b, b'\t' | b'\n' | b'\r')),
            "tokenizer: non-space whitespace in normalized text"
        );

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                emit(&normalized[start..i], pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&normalized[start..], pos);
        }
    }

    /// Collects the tokens of `normalized` in left-to-right order.
    pub fn tokens<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut out = Vec::with_capacity(normalized.len() / 5 + 1);
        self.tokenize(normalized, |text, _| out.push(text));
        out
    }
}
