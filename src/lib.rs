//! Weighted benchmark results aggregation.
//!
//! Each benchmark case produces two scores: one with the feature under test
//! turned off and one with it turned on. This crate combines those scores
//! across a weighted set of cases into a single Markdown report showing the
//! per-case and aggregate effectiveness (`on - off`).
//!
//! # Pipeline
//!
//! - **Weights** (`weights`): load `weights.json`, validate, normalize to 1.
//! - **Scores**, one of:
//!   - **Runner** (`runner`): run an external script per case directory and
//!     read the `off.json` / `on.json` it writes (`generate_results`).
//!   - **Collector** (`collect`): discover existing result files under a
//!     directory tree, possibly from several runs, and average them per case
//!     (`aggregate_results`).
//! - **Aggregate** (`aggregate`): weighted off/on totals.
//! - **Report** (`report`): render and write the Markdown document.
//!
//! Everything runs once, sequentially, in weight configuration order.

pub mod aggregate;
pub mod collect;
pub mod config;
pub mod logging;
pub mod report;
pub mod runner;
pub mod scores;
pub mod weights;

// --- Re-exports for ergonomic external use ---------------------------------

pub use aggregate::{aggregate, Aggregate, CaseResult};
pub use collect::{
    collect_results, discover_score_files, infer_run_id, CollectOptions, CollectWarning,
    Collection, DEFAULT_EMPTY_AVERAGE,
};
pub use config::{ReportConfig, RunnerCommand};
pub use report::{
    print_console_summary, render_markdown, write_markdown, write_markdown_report, ReportHeader,
    ResultsReport,
};
pub use runner::{run_cases, CaseRunner, RunCasesError, RunnerError, ScriptRunner};
pub use scores::{read_score, Condition, DataError, OFF_FILE, ON_FILE};
pub use weights::{CaseWeight, ConfigError, WeightConfig};
