// src/weights.rs
//
// Weighted case configuration (weights.json).
//
// The document is a JSON object mapping case names to positive weights.
// Weights are normalized to sum to 1 and kept in document key order, which
// is also the row order of the rendered report.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single case and its normalized weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWeight {
    /// Case name (non-empty).
    pub case: String,
    /// Weight divided by the sum of all weights.
    pub weight: f64,
}

/// Validated, normalized weight configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightConfig {
    cases: Vec<CaseWeight>,
}

impl WeightConfig {
    /// Read and validate a weight configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a weight configuration from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(contents).map_err(ConfigError::Parse)?;
        Self::from_value(&value)
    }

    /// Validate a parsed JSON document and normalize its weights.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or(ConfigError::NotAnObject)?;
        if map.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut raw = Vec::with_capacity(map.len());
        for (case, weight) in map {
            if case.is_empty() {
                return Err(ConfigError::EmptyCaseName);
            }
            // Booleans and numeric strings are rejected: only JSON numbers count.
            let w = weight
                .as_f64()
                .filter(|w| w.is_finite() && *w > 0.0)
                .ok_or_else(|| ConfigError::InvalidWeight {
                    case: case.clone(),
                    value: weight.to_string(),
                })?;
            raw.push((case.clone(), w));
        }

        // Scale by the largest weight first so the sum stays finite.
        let max = raw.iter().map(|(_, w)| *w).fold(0.0_f64, f64::max);
        let total: f64 = raw.iter().map(|(_, w)| w / max).sum();
        let cases = raw
            .into_iter()
            .map(|(case, w)| CaseWeight {
                case,
                weight: (w / max) / total,
            })
            .collect();

        Ok(Self { cases })
    }

    /// Cases in configuration order.
    pub fn cases(&self) -> &[CaseWeight] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseWeight> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Always false for a successfully loaded configuration.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Normalized weight for a case, if configured.
    pub fn weight_of(&self, case: &str) -> Option<f64> {
        self.cases.iter().find(|c| c.case == case).map(|c| c.weight)
    }
}

impl<'a> IntoIterator for &'a WeightConfig {
    type Item = &'a CaseWeight;
    type IntoIter = std::slice::Iter<'a, CaseWeight>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Errors raised while loading configuration (weights or settings file).
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read.
    Io { path: PathBuf, source: io::Error },
    /// File is not valid JSON.
    Parse(serde_json::Error),
    /// Weights document is not a JSON object.
    NotAnObject,
    /// Weights document has no cases.
    Empty,
    /// A case key is the empty string.
    EmptyCaseName,
    /// A weight is not a finite number greater than zero.
    InvalidWeight { case: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config '{}': {}", path.display(), source)
            }
            ConfigError::Parse(source) => write!(f, "Failed to parse config JSON: {}", source),
            ConfigError::NotAnObject => {
                write!(f, "weights config must be a JSON object of case -> weight")
            }
            ConfigError::Empty => write!(f, "weights config must be a non-empty object"),
            ConfigError::EmptyCaseName => write!(f, "invalid case key in weights config: empty"),
            ConfigError::InvalidWeight { case, value } => {
                write!(
                    f,
                    "invalid weight for {}: {} (expected a positive number)",
                    case, value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(source) => Some(source),
            _ => None,
        }
    }
}
