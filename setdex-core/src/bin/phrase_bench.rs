//! Phrase Index Benchmarking Tool
//!
//! Builds a [`PhraseIndex`] from a title list and reports build time, index
//! size and similarity-query latency. The input is a text file with one
//! record per line; the first comma-separated column, stripped of spaces and
//! double quotes, is the phrase:
//!
//! ```text
//! "The Godfather",1972,R
//! "Goodfellas",1990,R
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Build the index and print its statistics
//! ./target/release/phrase_bench /path/to/titles.csv
//!
//! # Also time similarity queries for the given phrases
//! ./target/release/phrase_bench /path/to/titles.csv "godfater" "good felas"
//!
//! # Show per-index debug events
//! RUST_LOG=setdex_core=debug ./target/release/phrase_bench /path/to/titles.csv
//! ```
//!
//! ## Example Output
//!
//! ```text
//! Titles      : 262_876
//! Build       : 0.912 s
//! Phrases/sec : 288_241
//! Trigrams    : 31_842 unique
//! Phrases     : 236_104 unique
//! Index       : 236104 sets, 31842 symbols, 262876 payloads, ...
//! ```

use std::env;
use std::error::Error;
use std::fs;
use std::time::{Duration, Instant};

use setdex_core::{PhraseIndex, DEFAULT_SIMILARITY_THRESHOLD};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const SHOWN_MATCHES: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: phrase_bench <path> [query...]");
        std::process::exit(1);
    }

    let path = &args[1];
    let queries = &args[2..];

    info!(path = %path, "loading titles");
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let titles: Vec<&str> = text.lines().map(first_column).collect();

    println!("File size   : {}", fmt_bytes(bytes.len() as u64));
    println!("Titles      : {}", fmt_count(titles.len() as u64));

    let mut index: PhraseIndex = PhraseIndex::new();
    let start = Instant::now();
    for title in &titles {
        index.add(title)?;
    }
    let build = start.elapsed();

    println!("Build       : {:.3} s", build.as_secs_f64());
    println!(
        "Phrases/sec : {}",
        fmt_count((titles.len() as f64 / build.as_secs_f64()) as u64)
    );
    println!("Trigrams    : {} unique", fmt_count(index.trigram_count() as u64));
    println!("Phrases     : {} unique", fmt_count(index.phrase_count()));
    println!("Index       : {}\n", index.index().stats());

    for query in queries {
        bench_query(&index, query)?;
    }

    Ok(())
}

/// First CSV column with surrounding spaces and quotes removed.
fn first_column(line: &str) -> &str {
    let head = line.split(',').next().unwrap_or(line);
    head.trim_matches(|c| c == ' ' || c == '"')
}

fn bench_query(index: &PhraseIndex, query: &str) -> Result<(), Box<dyn Error>> {
    println!("=== find_similar {query:?} ===");

    warmup(|| {
        let found = index.find_similar(query, DEFAULT_SIMILARITY_THRESHOLD);
        std::hint::black_box(found.map(|r| r.len()).ok());
    });

    let elapsed = measure(|| {
        let found = index.find_similar(query, DEFAULT_SIMILARITY_THRESHOLD);
        std::hint::black_box(found.map(|r| r.len()).ok());
    });

    let mut found = index.find_similar(query, DEFAULT_SIMILARITY_THRESHOLD)?;
    println!("--------------------------------");
    println!("Elapsed     : {:.3} ms", elapsed.as_secs_f64() * 1e3);
    println!("Matches     : {}", fmt_count(found.len() as u64));
    for (score, titles) in found.get(Some(SHOWN_MATCHES)) {
        println!("  {score:.3}  {}", titles.join(" | "));
    }
    println!("--------------------------------\n");
    Ok(())
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
