//! Fixed-width report table.
//!
//! ```text
//! Rank   Three-Word Phrase Count
//! -------------------------------
//! [001]: [the cat sat] => [2]
//! [002]: [cat sat the] => [1]
//!
//! ```
//!
//! A report is rendered to a `String` first and written with one call, so
//! reports of concurrently finishing documents never interleave.

use std::fmt;
use std::io::{self, Write};

use triphrase_core::table::longest_phrase;
use triphrase_core::{RankedEntry, TableStats};

/// Narrowest phrase column.
pub const MIN_PHRASE_WIDTH: usize = 6;

/// Header label of the phrase column.
pub const PHRASE_LABEL: &str = "Three-Word Phrase";

/// One document's ranked report.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a, 't> {
    title: Option<&'a str>,
    entries: &'a [RankedEntry<'t>],
    stats: Option<TableStats>,
}

impl<'a, 't> Report<'a, 't> {
    /// A report of `entries`, already ranked.
    pub fn new(entries: &'a [RankedEntry<'t>]) -> Self {
        Self {
            title: None,
            entries,
            stats: None,
        }
    }

    /// Precedes the table with a `==> title <==` line.
    pub fn titled(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Appends a statistics line under the rows.
    pub fn with_stats(mut self, stats: TableStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Width of the phrase column.
    pub fn phrase_width(&self) -> usize {
        longest_phrase(self.entries).max(MIN_PHRASE_WIDTH)
    }

    /// Renders the whole report, trailing blank line included.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Writes the rendered report with a single `write_all`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

impl fmt::Display for Report<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.phrase_width();

        if let Some(title) = self.title {
            writeln!(f, "==> {title} <==")?;
        }

        let header = format!(
            "{:<6} {:<label_width$} {:>5}\n",
            "Rank",
            PHRASE_LABEL,
            "Count",
            label_width = width + 5
        );
        f.write_str(&header)?;
        // The rule is as long as the header including its newline.
        writeln!(f, "{}", "-".repeat(header.len()))?;

        for entry in self.entries {
            writeln!(
                f,
                "[{:03}]: [{:<width$}] => [{}]",
                entry.rank, entry.phrase, entry.count
            )?;
        }

        if let Some(stats) = &self.stats {
            writeln!(f, "{stats}")?;
        }

        writeln!(f)
    }
}
