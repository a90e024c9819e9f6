//! Phrase Pipeline Benchmarking Tool
//!
//! Measures the throughput of the phrase pipeline on large text files, such
//! as Project Gutenberg books or Wikipedia dumps.
//!
//! ## What It Benchmarks
//!
//! 1. **Normalization**: Case folding and separator collapsing
//! 2. **Tokenization**: Splitting normalized text into tokens
//! 3. **Count**: Full normalize → tokenize → phrase count, table included
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/phrase_bench /path/to/book.txt
//!
//! # Letters and digits only
//! ./target/release/phrase_bench /path/to/book.txt alnum
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Count ===
//! --------------------------------
//! Mode        : Count
//! Elapsed     : 0.052 s
//! Throughput  : 0.061 GiB/s
//! Tokens      : 566_321
//! Tokens/sec  : 10_890_788
//! --------------------------------
//! ```
//!
//! Build in release mode and use inputs of several megabytes for stable numbers.

use std::env;
use std::fs;
use std::time::{Duration, Instant};

use triphrase_core::analyzer::normalizer::TextNormalizer;
use triphrase_core::analyzer::tokenizer::Tokenizer;
use triphrase_core::{CounterConfig, PhraseCounter, WordPolicy};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: phrase_bench <path> [alnum]");
        std::process::exit(1);
    }

    let path = &args[1];

    let policy = match args.get(2).map(String::as_str) {
        Some("alnum") => WordPolicy::Alnum,
        _ => WordPolicy::AlnumApostropheHyphen,
    };

    println!("Loading file...");
    let bytes = fs::read(path)?;
    let input = String::from_utf8_lossy(&bytes);

    println!("File size: {}", fmt_bytes(bytes.len() as u64));
    println!("Policy:    {:?}\n", policy);

    bench_normalize(&input, policy);
    bench_tokenize(&input, policy);
    bench_count(&bytes, policy);

    Ok(())
}

fn bench_normalize(input: &str, policy: WordPolicy) {
    let normalizer = TextNormalizer::with_policy(policy);
    let mut out = String::with_capacity(input.len());

    println!("=== Normalize ===");

    warmup(|| normalizer.normalize_into(input, &mut out));
    let elapsed = measure(|| normalizer.normalize_into(input, &mut out));

    print_perf("Normalize", input.len(), elapsed, 0);
}

fn bench_tokenize(input: &str, policy: WordPolicy) {
    let normalized = TextNormalizer::with_policy(policy).normalize(input);
    let tokenizer = Tokenizer::new();

    println!("=== Tokenize ===");

    warmup(|| {
        let mut sink = 0u64;
        tokenizer.tokenize(&normalized, |_t, _p| sink += 1);
        std::hint::black_box(sink);
    });

    let mut tokens = 0u64;
    let elapsed = measure(|| {
        let mut local = 0u64;
        tokenizer.tokenize(&normalized, |_t, _p| local += 1);
        tokens = local;
        std::hint::black_box(tokens);
    });

    print_perf("Tokenize", normalized.len(), elapsed, tokens);
}

fn bench_count(bytes: &[u8], policy: WordPolicy) {
    let mut counter = PhraseCounter::with_config(CounterConfig {
        word_policy: policy,
        max_document_bytes: None,
    });

    println!("=== Count ===");

    warmup(|| {
        std::hint::black_box(counter.count(bytes).map(|t| t.len()).unwrap_or(0));
    });

    let mut tokens = 0u64;
    let mut distinct = 0usize;
    let elapsed = measure(|| {
        if let Ok(table) = counter.count(bytes) {
            tokens = table.token_count() as u64;
            distinct = table.len();
        }
        std::hint::black_box(tokens);
    });

    print_perf("Count", bytes.len(), elapsed, tokens);
    println!("Distinct    : {}\n", fmt_count(distinct as u64));
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, tokens: u64) {
    let secs = elapsed.as_secs_f64().max(f64::MIN_POSITIVE);
    let gib = input_bytes as f64 / (1024.0 * 1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.3} GiB/s", gib / secs);

    if tokens > 0 {
        println!("Tokens      : {}", fmt_count(tokens));
        println!("Tokens/sec  : {}", fmt_count((tokens as f64 / secs) as u64));
    }

    println!("--------------------------------");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
