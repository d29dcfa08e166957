// src/bin/aggregate_results.rs
//
// Aggregate result files that are already on disk into the Markdown report.
//
// Looks for <case>/off.json and <case>/on.json anywhere under --input-dir,
// so both a single run (<dir>/<case>/...) and several repeated runs
// (<dir>/<run_id>/<case>/...) work. Scores are averaged per case across
// runs. Cases with no off.json are skipped with a warning.
//
// Usage:
//   aggregate_results --input-dir runs/ --output RESULTS.md
//   aggregate_results --input-dir runs/ --weights python/weights.json --output out/python.md

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use bench_results::config::parse_finite_f64;
use bench_results::logging::init_logging;
use bench_results::{
    collect_results, print_console_summary, write_markdown_report, ReportConfig, ResultsReport,
    WeightConfig,
};

/// Command-line arguments for aggregate_results.
#[derive(Parser, Debug)]
#[command(name = "aggregate_results", version, about)]
struct Cli {
    /// Root directory holding the per-case result trees.
    #[arg(long)]
    input_dir: PathBuf,

    /// Output path for the Markdown report.
    #[arg(long)]
    output: PathBuf,

    /// Weight configuration.
    #[arg(long, default_value = "weights.json")]
    weights: PathBuf,

    /// Average used when a case has no result files for a condition.
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite_f64)]
    empty_average: Option<f64>,

    /// Optional JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rule name shown in the report title.
    #[arg(long)]
    rule: Option<String>,

    /// Language label shown in the report title.
    #[arg(long)]
    language: Option<String>,

    /// Benchmark repository identifier line.
    #[arg(long)]
    benchmark_repo: Option<String>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Defaults, then settings file, then env, then CLI flags.
fn build_config(cli: &Cli) -> Result<ReportConfig, bench_results::ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    cfg.apply_env_overrides();

    if let Some(rule) = &cli.rule {
        cfg.header.rule = rule.clone();
    }
    if let Some(language) = &cli.language {
        cfg.header.language = language.clone();
    }
    if let Some(repo) = &cli.benchmark_repo {
        cfg.header.benchmark_repo = repo.clone();
    }
    if let Some(v) = cli.empty_average {
        cfg.empty_average = v;
    }

    Ok(cfg)
}

fn cmd_aggregate(cli: Cli) -> i32 {
    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let weights = match WeightConfig::load(&cli.weights) {
        Ok(w) => w,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    if !cli.input_dir.is_dir() {
        error!("Input directory not found: {}", cli.input_dir.display());
        return 1;
    }

    let collection = match collect_results(&cli.input_dir, &weights, &cfg.collect_options()) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let skipped = collection.skipped_cases();
    if !skipped.is_empty() {
        warn!(
            "{} of {} cases had no results: {}",
            skipped.len(),
            weights.len(),
            skipped.join(", ")
        );
    }
    info!(
        cases = collection.results.len(),
        runs = collection.run_count(),
        "collected results"
    );

    let runs = collection.run_count();
    let report = ResultsReport::new(cfg.header, collection.results, Some(runs));
    if let Err(e) = write_markdown_report(&report, &cli.output) {
        error!("Failed to write report '{}': {}", cli.output.display(), e);
        return 1;
    }

    print_console_summary(&report);
    println!();
    println!("Output written to: {}", cli.output.display());
    0
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    std::process::exit(cmd_aggregate(cli));
}
