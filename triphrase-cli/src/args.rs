//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use triphrase_core::{CounterConfig, FanOutConfig, WordPolicy};

/// Report the most frequent three-word phrases in each input.
///
/// With no paths, reads one document from standard input.
#[derive(Parser, Debug)]
#[command(name = "triphrase", version)]
pub struct Args {
    /// Text files to analyze, each reported separately
    pub paths: Vec<PathBuf>,

    /// Number of phrases to report per document
    #[arg(short = 'n', long = "top", default_value_t = 10, env = "TRIPHRASE_TOP")]
    pub top: usize,

    /// Which characters form words
    #[arg(long, value_enum, default_value_t = Words::AlnumApostropheHyphen)]
    pub words: Words,

    /// Reject documents larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<usize>,

    /// Maximum documents processed at once (default: all of them)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Stop at the first document that fails instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Print token and phrase statistics under each report
    #[arg(long)]
    pub stats: bool,
}

/// Word character policy as spelled on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Words {
    /// Letters and digits
    Alnum,
    /// Letters, digits, apostrophe and hyphen
    AlnumApostropheHyphen,
}

impl From<Words> for WordPolicy {
    fn from(w: Words) -> Self {
        match w {
            Words::Alnum => WordPolicy::Alnum,
            Words::AlnumApostropheHyphen => WordPolicy::AlnumApostropheHyphen,
        }
    }
}

impl Args {
    /// Fan-out configuration built from the flags.
    pub fn fan_out_config(&self) -> FanOutConfig {
        FanOutConfig {
            max_concurrency: self.jobs,
            counter: CounterConfig {
                word_policy: self.words.into(),
                max_document_bytes: self.max_bytes,
            },
        }
    }
}
