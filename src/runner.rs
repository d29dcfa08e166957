// src/runner.rs
//
// Case runner: executes the external per-case benchmark script in each case
// directory, then reads the off/on results it produced.
//
// Runs are strictly sequential and all-or-nothing: the first runner failure
// or unreadable result aborts the whole aggregation.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::aggregate::CaseResult;
use crate::scores::{read_score, DataError, Condition};
use crate::weights::WeightConfig;

/// Executes the benchmark for one case.
///
/// On success the runner must have written `off.json` and `on.json` into
/// `case_dir`.
pub trait CaseRunner {
    fn run_case(&self, case: &str, case_dir: &Path) -> Result<(), RunnerError>;
}

/// Runs an external program with the case directory as working directory.
///
/// Stdio is inherited and there is no timeout: a hung child hangs the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRunner {
    pub program: String,
    pub args: Vec<String>,
}

impl ScriptRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ScriptRunner {
    /// `bash run.sh`
    fn default() -> Self {
        Self::new("bash", vec!["run.sh".to_string()])
    }
}

impl CaseRunner for ScriptRunner {
    fn run_case(&self, case: &str, case_dir: &Path) -> Result<(), RunnerError> {
        debug!(case, dir = %case_dir.display(), command = %self.command_line(), "spawning case runner");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(case_dir)
            .status()
            .map_err(|source| RunnerError::Spawn {
                case: case.to_string(),
                command: self.command_line(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunnerError::Failed {
                case: case.to_string(),
                code: status.code(),
            })
        }
    }
}

/// Run every configured case under `cases_root` and read its scores.
///
/// Case directories are `cases_root/<case>`. Results come back in weight
/// configuration order.
pub fn run_cases(
    weights: &WeightConfig,
    cases_root: &Path,
    runner: &dyn CaseRunner,
) -> Result<Vec<CaseResult>, RunCasesError> {
    let mut results = Vec::with_capacity(weights.len());

    for cw in weights {
        let case_dir = cases_root.join(&cw.case);
        info!(case = %cw.case, weight = cw.weight, "running case");

        runner.run_case(&cw.case, &case_dir)?;

        let off = read_score(&case_dir.join(Condition::Off.file_name()))?;
        let on = read_score(&case_dir.join(Condition::On.file_name()))?;
        debug!(case = %cw.case, off, on, "case scores");

        results.push(CaseResult::new(cw.case.clone(), cw.weight, off, on));
    }

    Ok(results)
}

/// Errors from the external case runner.
#[derive(Debug)]
pub enum RunnerError {
    /// The runner program could not be started.
    Spawn {
        case: String,
        command: String,
        source: io::Error,
    },
    /// The runner exited unsuccessfully. `code` is None when killed by a signal.
    Failed { case: String, code: Option<i32> },
}

impl RunnerError {
    /// Process exit code to propagate: the child's own code when it has one.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Spawn {
                case,
                command,
                source,
            } => write!(
                f,
                "Failed to start runner '{}' for case '{}': {}",
                command, case, source
            ),
            RunnerError::Failed {
                case,
                code: Some(code),
            } => write!(f, "Runner for case '{}' exited with code {}", case, code),
            RunnerError::Failed { case, code: None } => {
                write!(f, "Runner for case '{}' was terminated by a signal", case)
            }
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Spawn { source, .. } => Some(source),
            RunnerError::Failed { .. } => None,
        }
    }
}

/// Failure of a full `run_cases` pass.
#[derive(Debug)]
pub enum RunCasesError {
    Runner(RunnerError),
    Data(DataError),
}

impl RunCasesError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunCasesError::Runner(e) => e.exit_code(),
            RunCasesError::Data(_) => 1,
        }
    }
}

impl From<RunnerError> for RunCasesError {
    fn from(e: RunnerError) -> Self {
        RunCasesError::Runner(e)
    }
}

impl From<DataError> for RunCasesError {
    fn from(e: DataError) -> Self {
        RunCasesError::Data(e)
    }
}

impl fmt::Display for RunCasesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunCasesError::Runner(e) => write!(f, "{}", e),
            RunCasesError::Data(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunCasesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunCasesError::Runner(e) => Some(e),
            RunCasesError::Data(e) => Some(e),
        }
    }
}
