//! Public API for counting the phrases of a document.

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::tokenizer::Tokenizer;
use crate::analyzer::trigram::{count_phrases, PhraseExtractor, SlidingWindowExtractor};
use crate::table::types::FrequencyTable;
use triphrase_types::{CountError, CounterConfig};

/// Normalizer → Tokenizer → phrase counter pipeline.
///
/// Holds reusable scratch buffers, so one counter should be kept per worker
/// and fed documents one after another. Each call returns a fresh table.
#[derive(Debug, Clone)]
pub struct PhraseCounter<E = SlidingWindowExtractor> {
    config: CounterConfig,
    normalizer: TextNormalizer,
    tokenizer: Tokenizer,
    extractor: E,
    norm_buf: String,
    phrase_buf: String,
}

impl Default for PhraseCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseCounter {
    /// Creates a counter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CounterConfig::default())
    }

    /// Creates a counter with a custom configuration.
    pub fn with_config(config: CounterConfig) -> Self {
        Self::with_extractor(config, SlidingWindowExtractor)
    }
}

impl<E: PhraseExtractor> PhraseCounter<E> {
    /// Creates a counter that windows tokens with `extractor`.
    pub fn with_extractor(config: CounterConfig, extractor: E) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::with_policy(config.word_policy),
            tokenizer: Tokenizer::new(),
            extractor,
            norm_buf: String::with_capacity(256),
            phrase_buf: String::with_capacity(64),
        }
    }

    /// Returns the active configuration.
    #[inline(always)]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Counts every three-word phrase of `document`.
    ///
    /// Fewer than three tokens (including empty input) yield an empty table,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `CountError::TooLarge` if the document exceeds the configured
    /// `max_document_bytes`.
    pub fn count(&mut self, document: &[u8]) -> Result<FrequencyTable, CountError> {
        if let Some(max_size) = self.config.max_document_bytes {
            if document.len() > max_size {
                return Err(CountError::TooLarge {
                    size: document.len(),
                    max_size,
                });
            }
        }

        let Self {
            normalizer,
            tokenizer,
            extractor,
            norm_buf,
            phrase_buf,
            ..
        } = self;

        normalizer.normalize_bytes_into(document, norm_buf);
        let tokens = tokenizer.tokens(norm_buf.as_str());

        let mut table = FrequencyTable::with_capacity(count_phrases(tokens.len()));
        table.tokens = tokens.len();
        extractor.extract(&tokens, |phrase| table.record(phrase, phrase_buf));

        Ok(table)
    }

    /// Counts the phrases of a text document.
    #[inline]
    pub fn count_str(&mut self, text: &str) -> Result<FrequencyTable, CountError> {
        self.count(text.as_bytes())
    }
}

/// Counts the three-word phrases of one document with the default
/// configuration.
///
/// # Example
///
/// ```
/// use triphrase_core::count_trigrams;
///
/// let table = count_trigrams(b"The cat sat. The cat sat.").unwrap();
/// assert_eq!(table.get("the cat sat"), Some(2));
/// ```
pub fn count_trigrams(document: &[u8]) -> Result<FrequencyTable, CountError> {
    PhraseCounter::new().count(document)
}
