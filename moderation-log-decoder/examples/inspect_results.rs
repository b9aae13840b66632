//! Standalone moderation log inspection tool
//!
//! Loads a JSONL moderation log and prints the flattened column set with
//! per-column coverage (how many rows carry a value).
//!
//! Usage:
//!   inspect_results <results.jsonl> [--skip-invalid] [--limit <count>]
//!
//! Example:
//!   cargo run --example inspect_results -- data/results.jsonl --limit 100

use moderation_log_decoder::{Loader, LoaderConfig};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let mut path: Option<PathBuf> = None;
    let mut config = LoaderConfig::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--skip-invalid" => config = config.with_skip_invalid_lines(true),
            "--limit" => match args.next().and_then(|v| v.parse().ok()) {
                Some(limit) => config = config.with_max_records(limit),
                None => {
                    eprintln!("--limit needs a number");
                    std::process::exit(2);
                }
            },
            other => path = Some(PathBuf::from(other)),
        }
    }

    let Some(path) = path else {
        eprintln!("Usage: inspect_results <results.jsonl> [--skip-invalid] [--limit <count>]");
        std::process::exit(2);
    };

    let table = match Loader::new(config).load_file(&path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error loading {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    let (rows, columns) = table.shape();
    println!("=== {} ===", path.display());
    println!("Rows: {}", rows);
    println!("Columns: {}", columns);
    println!();

    let flagged = table.rows().iter().filter(|r| r.openai_flagged).count();
    println!("Flagged by OpenAI: {}", flagged);
    println!();

    println!("{:<32} {:>8}", "column", "present");
    for column in table.columns() {
        match table.numeric_column(column) {
            Some(values) => {
                let present = values.iter().filter(|v| v.is_some()).count();
                println!("{:<32} {:>8}", column, present);
            }
            None => println!("{:<32} {:>8}", column, "text"),
        }
    }
}
