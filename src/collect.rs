// src/collect.rs
//
// Result collector: discovers off.json/on.json files already on disk and
// averages them per case.
//
// Supported layouts under the input root:
//   <root>/<case>/off.json                (single run)
//   <root>/<run_id>/<case>/off.json       (repeated runs)
// A file belongs to a case when the trailing components of its directory
// equal the case key, so nested keys such as `group/x` and deeper nestings
// are picked up as well. The longest matching key wins.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::aggregate::CaseResult;
use crate::scores::{read_score, Condition, DataError};
use crate::weights::WeightConfig;

/// Mean reported for a condition with no result files.
pub const DEFAULT_EMPTY_AVERAGE: f64 = 0.0;

/// Options for `collect_results`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectOptions {
    /// Value used as the average of an empty score list. A case with off
    /// files but no on files gets this as its `on` score.
    pub empty_average: f64,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            empty_average: DEFAULT_EMPTY_AVERAGE,
        }
    }
}

/// Non-fatal conditions found while collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectWarning {
    /// No off.json found for the case; it was left out of the report.
    MissingOff { case: String },
}

/// Outcome of a collection pass.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Results for cases with at least one off.json, in configuration order.
    pub results: Vec<CaseResult>,
    /// Run identifiers inferred from the matched file paths.
    pub run_ids: BTreeSet<String>,
    pub warnings: Vec<CollectWarning>,
}

impl Collection {
    pub fn run_count(&self) -> usize {
        self.run_ids.len()
    }

    /// Names of configured cases that were left out.
    pub fn skipped_cases(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .map(|w| match w {
                CollectWarning::MissingOff { case } => case.as_str(),
            })
            .collect()
    }
}

/// Recursively discover every off.json / on.json under `root`, sorted.
///
/// A missing root yields an empty list. Symlinked directories below the
/// root are not followed.
pub fn discover_score_files(root: &Path) -> Result<Vec<PathBuf>, DataError> {
    let mut results = Vec::new();
    discover_recursive(root, &mut results)?;
    results.sort();
    Ok(results)
}

fn discover_recursive(dir: &Path, results: &mut Vec<PathBuf>) -> Result<(), DataError> {
    if !dir.is_dir() {
        return Ok(());
    }

    let io_err = |source: std::io::Error| DataError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        // file_type() does not follow symlinks.
        let is_dir = entry.file_type().map_err(io_err)?.is_dir();
        let path = entry.path();

        if is_dir {
            discover_recursive(&path, results)?;
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Condition::from_file_name)
            .is_some()
        {
            results.push(path);
        }
    }

    Ok(())
}

/// Best-effort run id: the name of the file's grandparent directory.
///
/// Returns None when the path is too shallow or the name is not UTF-8.
pub fn infer_run_id(path: &Path) -> Option<String> {
    let name = path.parent()?.parent()?.file_name()?;
    name.to_str().map(str::to_string)
}

/// Configured case whose key matches the trailing directories of `path`.
fn case_of<'a>(path: &Path, cases: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let dir = path.parent()?;
    cases
        .filter(|case| dir.ends_with(*case))
        .max_by_key(|case| Path::new(case).components().count())
}

/// Run id for a file matched to `case`: the directory just above the case
/// directory. Same as `infer_run_id` for single-component keys.
fn run_id_for(path: &Path, case: &str) -> Option<String> {
    let depth = Path::new(case).components().count();
    let name = path.parent()?.ancestors().nth(depth)?.file_name()?;
    name.to_str().map(str::to_string)
}

/// Matched result files for a single case.
#[derive(Debug, Default)]
struct CaseFiles {
    off: Vec<PathBuf>,
    on: Vec<PathBuf>,
}

fn average(scores: &[f64], empty_average: f64) -> f64 {
    if scores.is_empty() {
        empty_average
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn read_scores(paths: &[PathBuf]) -> Result<Vec<f64>, DataError> {
    paths.iter().map(|p| read_score(p)).collect()
}

/// Collect and average per-case scores found under `root`.
///
/// Cases without any off.json are skipped with a warning and their weight is
/// not redistributed. Unreadable or malformed result files are fatal.
pub fn collect_results(
    root: &Path,
    weights: &WeightConfig,
    options: &CollectOptions,
) -> Result<Collection, DataError> {
    let mut by_case: BTreeMap<&str, CaseFiles> = weights
        .iter()
        .map(|cw| (cw.case.as_str(), CaseFiles::default()))
        .collect();

    for path in discover_score_files(root)? {
        let Some(condition) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Condition::from_file_name)
        else {
            continue;
        };
        let Some(case) = case_of(&path, weights.iter().map(|cw| cw.case.as_str())) else {
            continue;
        };
        let Some(files) = by_case.get_mut(case) else {
            continue;
        };

        match condition {
            Condition::Off => files.off.push(path),
            Condition::On => files.on.push(path),
        }
    }

    let mut collection = Collection::default();

    for cw in weights {
        let Some(files) = by_case.get(cw.case.as_str()) else {
            continue;
        };

        if files.off.is_empty() {
            warn!(case = %cw.case, root = %root.display(), "no off.json found; skipping case");
            collection.warnings.push(CollectWarning::MissingOff {
                case: cw.case.clone(),
            });
            continue;
        }

        let off_scores = read_scores(&files.off)?;
        let on_scores = read_scores(&files.on)?;
        let off = average(&off_scores, options.empty_average);
        let on = average(&on_scores, options.empty_average);

        debug!(
            case = %cw.case,
            off_files = files.off.len(),
            on_files = files.on.len(),
            off,
            on,
            "averaged case scores"
        );

        collection
            .run_ids
            .extend(
                files
                    .off
                    .iter()
                    .chain(&files.on)
                    .filter_map(|p| run_id_for(p, &cw.case)),
            );
        collection
            .results
            .push(CaseResult::new(cw.case.clone(), cw.weight, off, on));
    }

    Ok(collection)
}
