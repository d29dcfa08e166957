// src/bin/generate_results.rs
//
// Run every weighted benchmark case and write the Markdown results report.
//
// For each case in weights.json (in file order) the runner command is
// executed inside <cases-root>/<case>; it must leave off.json and on.json
// behind. Any failure aborts without writing a report. A failing runner's
// exit code becomes this process's exit code.
//
// Usage:
//   generate_results --output RESULTS.md
//   generate_results --cases-root python --output results/python.md --verbose

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use bench_results::logging::init_logging;
use bench_results::{
    print_console_summary, run_cases, write_markdown_report, ReportConfig, ResultsReport,
    RunnerCommand, WeightConfig,
};

/// Command-line arguments for generate_results.
#[derive(Parser, Debug)]
#[command(name = "generate_results", version, about)]
struct Cli {
    /// Output path for the Markdown report.
    #[arg(long)]
    output: PathBuf,

    /// Directory containing one subdirectory per case.
    #[arg(long, default_value = ".")]
    cases_root: PathBuf,

    /// Weight configuration (default: <cases-root>/weights.json).
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Runner program executed in each case directory (default: bash).
    #[arg(long)]
    runner: Option<String>,

    /// Argument passed to the runner; repeat for several (default: run.sh).
    #[arg(long = "runner-arg", allow_hyphen_values = true)]
    runner_args: Vec<String>,

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
    if let Some(program) = &cli.runner {
        cfg.runner = RunnerCommand {
            program: program.clone(),
            args: cli.runner_args.clone(),
        };
    } else if !cli.runner_args.is_empty() {
        cfg.runner.args = cli.runner_args.clone();
    }

    Ok(cfg)
}

fn cmd_generate(cli: Cli) -> i32 {
    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let weights_path = cli
        .weights
        .clone()
        .unwrap_or_else(|| cli.cases_root.join("weights.json"));
    let weights = match WeightConfig::load(&weights_path) {
        Ok(w) => w,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };
    info!(
        cases = weights.len(),
        weights = %weights_path.display(),
        "loaded weights"
    );

    let runner = cfg.runner.to_runner();
    let results = match run_cases(&weights, &cli.cases_root, &runner) {
        Ok(results) => results,
        Err(e) => {
            error!("{}", e);
            return e.exit_code();
        }
    };

    let report = ResultsReport::new(cfg.header, results, None);
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
    std::process::exit(cmd_generate(cli));
}
