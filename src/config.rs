// src/config.rs
//
// Report settings with layered overrides:
//   defaults -> optional JSON settings file -> BENCH_RESULTS_* env -> CLI flags.
//
// Only presentation and policy knobs live here. Input/output paths are
// passed explicitly by the binaries.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::collect::{CollectOptions, DEFAULT_EMPTY_AVERAGE};
use crate::report::ReportHeader;
use crate::runner::ScriptRunner;
use crate::weights::ConfigError;

pub const ENV_RULE: &str = "BENCH_RESULTS_RULE";
pub const ENV_LANGUAGE: &str = "BENCH_RESULTS_LANGUAGE";
pub const ENV_BENCHMARK_REPO: &str = "BENCH_RESULTS_BENCHMARK_REPO";
pub const ENV_EMPTY_AVERAGE: &str = "BENCH_RESULTS_EMPTY_AVERAGE";
pub const ENV_RUNNER: &str = "BENCH_RESULTS_RUNNER";

/// Parse a finite f64. Used for `--empty-average` and its env variable.
pub fn parse_finite_f64(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(v) => Err(format!("{v} is not a finite number")),
        Err(e) => Err(format!("{raw:?}: {e}")),
    }
}

/// External runner command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for RunnerCommand {
    fn default() -> Self {
        let runner = ScriptRunner::default();
        Self {
            program: runner.program,
            args: runner.args,
        }
    }
}

impl RunnerCommand {
    /// Parse a whitespace-separated command line ("bash run.sh").
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn to_runner(&self) -> ScriptRunner {
        ScriptRunner::new(self.program.clone(), self.args.clone())
    }
}

/// Settings shared by both front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub header: ReportHeader,
    /// Average used for an empty score list when collecting from disk.
    pub empty_average: f64,
    pub runner: RunnerCommand,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            header: ReportHeader::default(),
            empty_average: DEFAULT_EMPTY_AVERAGE,
            runner: RunnerCommand::default(),
        }
    }
}

impl ReportConfig {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Apply BENCH_RESULTS_* overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. Unparseable values are warned about and
    /// leave the current setting untouched.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_RULE) {
            info!("[config] {ENV_RULE} = {v} (overrode default)");
            self.header.rule = v;
        }
        if let Some(v) = get(ENV_LANGUAGE) {
            info!("[config] {ENV_LANGUAGE} = {v} (overrode default)");
            self.header.language = v;
        }
        if let Some(v) = get(ENV_BENCHMARK_REPO) {
            info!("[config] {ENV_BENCHMARK_REPO} = {v} (overrode default)");
            self.header.benchmark_repo = v;
        }
        if let Some(raw) = get(ENV_EMPTY_AVERAGE) {
            match parse_finite_f64(&raw) {
                Ok(v) => {
                    info!("[config] {ENV_EMPTY_AVERAGE} = {v} (overrode default)");
                    self.empty_average = v;
                }
                Err(_) => warn!(
                    "[config] could not parse {ENV_EMPTY_AVERAGE} = {raw:?} as f64; using {}",
                    self.empty_average
                ),
            }
        }
        if let Some(raw) = get(ENV_RUNNER) {
            if let Some(cmd) = RunnerCommand::parse(&raw) {
                info!("[config] {ENV_RUNNER} = {raw} (overrode default)");
                self.runner = cmd;
            }
        }
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            empty_average: self.empty_average,
        }
    }
}
