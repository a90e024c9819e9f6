//! Word trigram extraction.
//!
//! Slides a three-token window across a token sequence, one token per step.
//! Windows overlap: `[a, b, c, d]` yields `a b c` then `b c d`.

use triphrase_types::{Phrase, PHRASE_LEN};

/// Extracts phrases from a token sequence using a sliding window.
///
/// For fewer than 3 tokens, no phrases are emitted.
/// For `L` tokens, exactly `L - 2` phrases are emitted.
///
/// # Example
///
/// ```
/// use triphrase_core::analyzer::trigram::extract_phrases;
///
/// let mut phrases = Vec::new();
/// extract_phrases(&["a", "b", "c", "d"], |p| phrases.push(p.to_string()));
///
/// assert_eq!(phrases, ["a b c", "b c d"]);
/// ```
#[inline(always)]
pub fn extract_phrases<'a, F>(tokens: &[&'a str], mut callback: F)
where
    F: FnMut(Phrase<'a>),
{
    tokens
        .windows(PHRASE_LEN)
        .filter_map(Phrase::from_window)
        .for_each(&mut callback);
}

/// Counts phrases without extracting them.
///
/// Returns 0 for fewer than 3 tokens.
#[inline(always)]
pub const fn count_phrases(token_count: usize) -> usize {
    token_count.saturating_sub(PHRASE_LEN - 1)
}

/// Trait for types that can extract phrases from a token sequence.
///
/// Lets the counter run over alternative windowing strategies without
/// changing the counting code.
pub trait PhraseExtractor {
    /// Extracts all phrases from `tokens`.
    fn extract<'a, F>(&self, tokens: &[&'a str], callback: F)
    where
        F: FnMut(Phrase<'a>);
}

/// Standard sliding-window extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowExtractor;

impl PhraseExtractor for SlidingWindowExtractor {
    #[inline(always)]
    fn extract<'a, F>(&self, tokens: &[&'a str], callback: F)
    where
        F: FnMut(Phrase<'a>),
    {
        extract_phrases(tokens, callback);
    }
}
