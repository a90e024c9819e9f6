//! Three-word phrase frequency pipeline.
//!
//! Raw document bytes flow through:
//!
//! 1. [`analyzer::normalizer`] - case folding, separator runs to one space
//! 2. [`analyzer::tokenizer`] - normalized text to word tokens
//! 3. [`analyzer::trigram`] - overlapping three-token windows
//! 4. [`table`] - per-document frequency table, statistics and top-N ranking
//!
//! [`fanout`] runs that pipeline concurrently, one task per document, and
//! delivers each table in completion order.
//!
//! ```
//! use triphrase_core::count_trigrams;
//!
//! let table = count_trigrams(b"The cat sat. The cat sat. The dog ran.").unwrap();
//! let top = table.top_n(1);
//!
//! assert_eq!(top[0].phrase, "the cat sat");
//! assert_eq!(top[0].count, 2);
//! assert_eq!(top[0].rank, 1);
//! ```

pub mod analyzer;
pub mod fanout;
pub mod table;

pub use fanout::{
    Completions, Document, DocumentError, DocumentOutcome, DocumentSource, FanOut, FanOutConfig,
    PipelineState,
};
pub use table::{count_trigrams, top_n, FrequencyTable, PhraseCounter, Ranking, TableStats};
pub use triphrase_types::{CountError, CounterConfig, Phrase, RankedEntry, WordPolicy};
