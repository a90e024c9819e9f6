//! `triphrase`: most frequent three-word phrases per document.
//!
//! ```text
//! triphrase pg10.txt pg11.txt        # one report per file, completion order
//! cat pg10.txt | triphrase -n 5      # standard input as a single document
//! ```

mod args;
mod input;
mod report;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use triphrase_core::fanout::trace_transition;
use triphrase_core::{FanOut, PipelineState};

use crate::args::Args;
use crate::report::Report;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // A lone stdin document has no siblings to keep going for.
    let (documents, strict) = if args.paths.is_empty() {
        (vec![input::read_stdin().await?], true)
    } else {
        (input::from_paths(&args.paths), args.strict)
    };
    let titled = documents.len() > 1;

    let fan_out = FanOut::new(args.fan_out_config());
    let mut completions = fan_out.spawn(documents);
    let mut failed = 0usize;

    while let Some(outcome) = completions.next().await {
        let table = match outcome.result {
            Ok(table) => table,
            Err(err) if strict => return Err(err.into()),
            Err(err) => {
                failed += 1;
                eprintln!("{err}");
                continue;
            }
        };

        let top = table.top_n(args.top);
        trace_transition(&outcome.name, PipelineState::Counting, PipelineState::Ranked);

        let mut report = Report::new(&top);
        if titled {
            report = report.titled(&outcome.name);
        }
        if args.stats {
            report = report.with_stats(table.stats());
        }

        report
            .write_to(&mut io::stdout().lock())
            .with_context(|| format!("error writing report for {}", outcome.name))?;
        trace_transition(&outcome.name, PipelineState::Ranked, PipelineState::Delivered);
    }

    if failed > 0 {
        warn!(
            failed,
            submitted = completions.submitted(),
            "some documents were skipped"
        );
    } else {
        debug!(documents = completions.delivered(), "all documents reported");
    }

    io::stdout().flush().context("error flushing stdout")?;
    Ok(())
}
