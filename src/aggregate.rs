// src/aggregate.rs
//
// Per-case results and the weighted aggregate over them.

use serde::Serialize;

/// Scores for one case under both conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    /// Case name.
    pub case: String,
    /// Normalized weight from the weight configuration.
    pub weight: f64,
    /// Score with the feature off.
    pub off: f64,
    /// Score with the feature on.
    pub on: f64,
}

impl CaseResult {
    pub fn new(case: impl Into<String>, weight: f64, off: f64, on: f64) -> Self {
        Self {
            case: case.into(),
            weight,
            off,
            on,
        }
    }

    /// Effectiveness: on - off.
    pub fn effect(&self) -> f64 {
        self.on - self.off
    }
}

/// Weighted totals across all present cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Σ weight × off.
    pub off_total: f64,
    /// Σ weight × on.
    pub on_total: f64,
}

impl Aggregate {
    /// Aggregate effectiveness: on_total - off_total.
    pub fn effect(&self) -> f64 {
        self.on_total - self.off_total
    }
}

/// Compute weighted totals over exactly the given results.
///
/// Weights are used as-is; if some configured cases are absent the weights
/// no longer sum to 1 and the totals shrink accordingly.
pub fn aggregate(results: &[CaseResult]) -> Aggregate {
    results.iter().fold(Aggregate::default(), |acc, r| Aggregate {
        off_total: acc.off_total + r.weight * r.off,
        on_total: acc.on_total + r.weight * r.on,
    })
}
