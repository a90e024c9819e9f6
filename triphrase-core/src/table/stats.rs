//! Statistics and TableStats.

use crate::table::types::FrequencyTable;

/// A snapshot of per-document counting statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Number of tokens in the document.
    pub tokens: usize,
    /// Number of phrase windows counted (`max(0, tokens - 2)`).
    pub phrases: u64,
    /// Number of distinct phrases.
    pub distinct_phrases: usize,
    /// Character length of the longest distinct phrase.
    pub longest_phrase: usize,
}

impl FrequencyTable {
    /// Returns table statistics.
    pub fn stats(&self) -> TableStats {
        TableStats {
            tokens: self.tokens,
            phrases: self.total(),
            distinct_phrases: self.counts.len(),
            longest_phrase: self
                .counts
                .keys()
                .map(|phrase| phrase.chars().count())
                .max()
                .unwrap_or(0),
        }
    }
}

impl TableStats {
    /// Fraction of windows that repeat an earlier phrase.
    pub fn repetition_ratio(&self) -> f32 {
        if self.phrases == 0 {
            return 0.0;
        }
        1.0 - self.distinct_phrases as f32 / self.phrases as f32
    }
}

impl core::fmt::Display for TableStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} tokens, {} phrases, {} distinct",
            self.tokens, self.phrases, self.distinct_phrases
        )?;

        if self.phrases > 0 {
            write!(f, " ({:.1}% repeated)", self.repetition_ratio() * 100.0)?;
        }

        Ok(())
    }
}
