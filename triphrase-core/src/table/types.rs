//! Frequency table type and constants.

use rustc_hash::FxHashMap;
use triphrase_types::Phrase;

/// Upper bound on the slots reserved up front for a new table.
///
/// Large documents repeat phrases heavily, so reserving one slot per window
/// would over-allocate; the map grows past this on demand.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 16;

/// Phrase occurrence counts for exactly one document.
///
/// Every key has a count of at least 1, and only phrases that occurred are
/// present. A table is filled by one pipeline run and never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    pub(crate) counts: FxHashMap<Box<str>, u32>,
    /// Number of tokens the counted document produced
    pub(crate) tokens: usize,
}

impl FrequencyTable {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table sized for roughly `phrases` windows.
    pub fn with_capacity(phrases: usize) -> Self {
        let mut counts = FxHashMap::default();
        counts.reserve(phrases.min(MAX_INITIAL_CAPACITY));
        Self { counts, tokens: 0 }
    }

    /// Builds a table from `(phrase, count)` pairs.
    ///
    /// Zero counts are skipped; repeated phrases accumulate.
    pub fn from_counts<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut table = Self::new();
        for (phrase, count) in pairs {
            if count == 0 {
                continue;
            }
            let slot = table.counts.entry(Box::from(phrase)).or_insert(0);
            *slot = slot.saturating_add(count);
        }
        table
    }

    /// Adds one occurrence of `phrase`.
    ///
    /// `buf` is scratch space for the canonical form; a key is allocated
    /// only the first time a phrase is seen.
    #[inline]
    pub fn record(&mut self, phrase: Phrase<'_>, buf: &mut String) {
        phrase.write_into(buf);
        self.increment(buf.as_str());
    }

    /// Adds one occurrence of an already canonical phrase string.
    #[inline]
    pub fn increment(&mut self, phrase: &str) {
        match self.counts.get_mut(phrase) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                self.counts.insert(Box::from(phrase), 1);
            }
        }
    }

    /// Returns the count for `phrase`, if it occurred.
    #[inline]
    pub fn get(&self, phrase: &str) -> Option<u32> {
        self.counts.get(phrase).copied()
    }

    /// Number of distinct phrases.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no phrase occurred.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (the number of windows counted).
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of tokens of the counted document.
    #[inline(always)]
    pub fn token_count(&self) -> usize {
        self.tokens
    }

    /// Iterates over `(phrase, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(phrase, &count)| (&**phrase, count))
    }
}
