//! Per-document phrase frequency tables.
//!
//! A [`FrequencyTable`] is created fresh for each document, filled by one
//! [`PhraseCounter`] run, ranked with [`FrequencyTable::top_n`], and then
//! dropped. Tables are never merged or shared between documents.
//!
//! Threading:
//! - [`PhraseCounter`] owns mutable scratch buffers. Use one per worker.
//! - [`FrequencyTable`] is plain owned data and moves freely between tasks.

mod api;
mod rank;
mod stats;
mod types;

pub use api::{count_trigrams, PhraseCounter};
pub use rank::{longest_phrase, top_n, Ranking, INLINE_RANKING};
pub use stats::TableStats;
pub use types::{FrequencyTable, MAX_INITIAL_CAPACITY};
