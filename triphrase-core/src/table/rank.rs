//! Frequency ranking and top-N selection.

use crate::table::types::FrequencyTable;
use smallvec::SmallVec;
use triphrase_types::RankedEntry;

/// Entries kept inline before a ranking spills to the heap.
pub const INLINE_RANKING: usize = 16;

/// Ranked report for one document, best entry first.
pub type Ranking<'t> = SmallVec<[RankedEntry<'t>; INLINE_RANKING]>;

#[inline(always)]
fn report_order(a: &RankedEntry<'_>, b: &RankedEntry<'_>) -> core::cmp::Ordering {
    b.cmp(a)
}

impl FrequencyTable {
    /// Returns the `n` most frequent phrases, ranked from 1.
    ///
    /// Sorted by descending count; equal counts are ordered by ascending
    /// phrase text. `n == 0` yields an empty ranking and `n` larger than the
    /// table returns every entry.
    pub fn top_n(&self, n: usize) -> Ranking<'_> {
        if n == 0 || self.counts.is_empty() {
            return Ranking::new();
        }

        let mut entries: Vec<RankedEntry<'_>> = self
            .counts
            .iter()
            .map(|(phrase, &count)| RankedEntry::new(&**phrase, count, 0))
            .collect();

        if n < entries.len() {
            entries.select_nth_unstable_by(n - 1, report_order);
            entries.truncate(n);
        }
        entries.sort_unstable_by(report_order);

        entries
            .into_iter()
            .zip(1u32..)
            .map(|(mut entry, rank)| {
                entry.rank = rank;
                entry
            })
            .collect()
    }
}

/// Returns the `n` most frequent phrases of `table`.
///
/// Free-function form of [`FrequencyTable::top_n`].
#[inline]
pub fn top_n(table: &FrequencyTable, n: usize) -> Ranking<'_> {
    table.top_n(n)
}

/// Character length of the longest phrase in `entries`, 0 when empty.
pub fn longest_phrase(entries: &[RankedEntry<'_>]) -> usize {
    entries
        .iter()
        .map(|entry| entry.phrase.chars().count())
        .max()
        .unwrap_or(0)
}
