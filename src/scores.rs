// src/scores.rs
//
// Per-case result documents (off.json / on.json).
//
// Each document is a JSON object with at least a numeric `score` field.
// Any other fields are ignored.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the "off" condition result.
pub const OFF_FILE: &str = "off.json";
/// File name of the "on" condition result.
pub const ON_FILE: &str = "on.json";

/// The two measurement conditions being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Off,
    On,
}

impl Condition {
    pub fn file_name(self) -> &'static str {
        match self {
            Condition::Off => OFF_FILE,
            Condition::On => ON_FILE,
        }
    }

    /// Map a result file name back to its condition.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            OFF_FILE => Some(Condition::Off),
            ON_FILE => Some(Condition::On),
            _ => None,
        }
    }
}

/// Read the `score` field of a result document.
pub fn read_score(path: &Path) -> Result<f64, DataError> {
    let contents = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_score(&contents, path)
}

/// Parse the `score` field from result JSON text. `path` is only used for
/// error reporting.
pub fn parse_score(contents: &str, path: &Path) -> Result<f64, DataError> {
    let value: Value = serde_json::from_str(contents).map_err(|e| DataError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(DataError::Malformed {
            path: path.to_path_buf(),
            message: "expected a JSON object".to_string(),
        });
    }

    value
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| DataError::MissingScore {
            path: path.to_path_buf(),
        })
}

/// Errors raised while reading result files.
#[derive(Debug)]
pub enum DataError {
    /// File missing or unreadable (also used for directory walk failures).
    Io { path: PathBuf, source: io::Error },
    /// File is not a JSON object.
    Malformed { path: PathBuf, message: String },
    /// Document has no numeric `score` field.
    MissingScore { path: PathBuf },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            DataError::Malformed { path, message } => {
                write!(f, "Malformed result file '{}': {}", path.display(), message)
            }
            DataError::MissingScore { path } => {
                write!(
                    f,
                    "Result file '{}' has no numeric 'score' field",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
