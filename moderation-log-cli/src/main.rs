//! Moderation Log Analyzer CLI Application
//!
//! This is the command-line interface for the moderation log analyzer.
//! It uses the moderation-log-decoder library and adds:
//! - Correlation between the two moderation sources
//! - Thresholded label agreement and disagreement analysis
//! - Student t-test between the sources' labels
//! - Category score distributions and SVG charts

use anyhow::{Context, Result};
use clap::Parser;
use moderation_log_decoder::Loader;
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;
use report::ChartRenderer;

/// Moderation Log Analyzer - Compare two content-moderation APIs
#[derive(Parser, Debug)]
#[command(name = "moderation-log-cli")]
#[command(about = "Analyze moderation API results (JSONL) from two services", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the JSONL results file (default: data/results.jsonl)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Score threshold above which a post is labeled harmful
    #[arg(short, long, value_name = "SCORE")]
    threshold: Option<f64>,

    /// Directory for rendered SVG charts
    #[arg(long, value_name = "DIR")]
    chart_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Skip malformed lines instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Maximum number of records to load (for testing)
    #[arg(long, value_name = "COUNT")]
    max_records: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Moderation Log Analyzer CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", moderation_log_decoder::VERSION);

    let config = resolve_config(&args)?;
    run(&config)
}

/// Config file (if any) with command-line overrides applied
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input.file = input.clone();
    }
    if let Some(threshold) = args.threshold {
        config.analysis.threshold = threshold;
    }
    if let Some(dir) = &args.chart_dir {
        config.output.chart_dir = dir.clone();
    }
    if args.no_charts {
        config.output.charts = false;
    }
    if args.skip_invalid {
        config.input.skip_invalid_lines = true;
    }
    if args.max_records.is_some() {
        config.input.max_records = args.max_records;
    }

    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Load the table, then run every report in order
fn run(config: &AppConfig) -> Result<()> {
    println!("═══════════════════════════════════════════════");
    println!("  Moderation API Comparison");
    println!("═══════════════════════════════════════════════\n");

    let table = Loader::new(config.loader_config())
        .load_file(&config.input.file)
        .with_context(|| format!("Failed to load results from {:?}", config.input.file))?;

    println!("✅ Data loaded: {:?}", table.shape());

    let renderer = if config.output.charts {
        Some(ChartRenderer::new(&config.output.chart_dir).with_context(|| {
            format!("Failed to prepare chart directory {:?}", config.output.chart_dir)
        })?)
    } else {
        log::info!("Chart rendering disabled");
        None
    };

    report::run_all(&table, &config.analysis_settings(), renderer.as_ref())
        .context("Report generation failed")?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
