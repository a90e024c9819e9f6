//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Folds case and collapses separator runs
//! - **Tokenizer**: Splits normalized text into word tokens
//! - **Trigram**: Slides a three-word window over the token stream

pub mod normalizer;
pub mod tokenizer;
pub mod trigram;

pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
pub use trigram::{PhraseExtractor, SlidingWindowExtractor};
