// src/report.rs
//
// Markdown results report: per-case table plus the weighted aggregate.
//
// The layout is fixed; identical inputs always render byte-identical output.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Aggregate, CaseResult};

/// Identification lines at the top of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportHeader {
    /// Rule under evaluation, shown in the title.
    pub rule: String,
    /// Language label of the benchmark suite.
    pub language: String,
    /// Benchmark repository identifier.
    pub benchmark_repo: String,
}

impl Default for ReportHeader {
    fn default() -> Self {
        Self {
            rule: "TDD".to_string(),
            language: "python".to_string(),
            benchmark_repo: "CursorCult/_benchmark_TDD".to_string(),
        }
    }
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsReport {
    pub header: ReportHeader,
    /// Number of aggregated runs; only reported when collecting from disk.
    pub runs: Option<usize>,
    /// Case rows in configuration order.
    pub cases: Vec<CaseResult>,
    pub aggregate: Aggregate,
}

impl ResultsReport {
    /// Build a report, computing the aggregate from `cases`.
    pub fn new(header: ReportHeader, cases: Vec<CaseResult>, runs: Option<usize>) -> Self {
        let aggregate = aggregate(&cases);
        Self {
            header,
            runs,
            cases,
            aggregate,
        }
    }
}

/// Write the report as Markdown.
pub fn write_markdown<W: Write>(report: &ResultsReport, mut writer: W) -> io::Result<()> {
    let header = &report.header;

    writeln!(
        writer,
        "# Results: `{}` ({})",
        header.rule, header.language
    )?;
    writeln!(writer)?;
    writeln!(writer, "Benchmark repo: `{}`", header.benchmark_repo)?;
    writeln!(writer)?;

    if let Some(runs) = report.runs {
        writeln!(writer, "Runs aggregated: `{}`", runs)?;
        writeln!(writer)?;
    }

    writeln!(writer, "## Per-case")?;
    writeln!(writer)?;
    writeln!(writer, "| Case | Off | On | Effectiveness |")?;
    writeln!(writer, "|---|---:|---:|---:|")?;
    for r in &report.cases {
        writeln!(
            writer,
            "| {} | {:.2} | {:.2} | {:+.2} |",
            r.case,
            r.off,
            r.on,
            r.effect()
        )?;
    }
    writeln!(writer)?;

    let agg = &report.aggregate;
    writeln!(writer, "## Aggregate (weighted)")?;
    writeln!(writer)?;
    writeln!(writer, "- Off: `{:.2}`", agg.off_total)?;
    writeln!(writer, "- On: `{:.2}`", agg.on_total)?;
    writeln!(writer, "- Effectiveness: `{:+.2}`", agg.effect())?;
    writeln!(writer)?;

    writer.flush()
}

/// Render the report to a String.
pub fn render_markdown(report: &ResultsReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail, and everything written is UTF-8.
    let _ = write_markdown(report, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write the Markdown report to `path`, creating parent directories and
/// replacing any existing file.
pub fn write_markdown_report(report: &ResultsReport, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_markdown(report, BufWriter::new(file))
}

/// Print a concise console summary.
pub fn print_console_summary(report: &ResultsReport) {
    println!(
        "Results: {} ({}) | cases={}{}",
        report.header.rule,
        report.header.language,
        report.cases.len(),
        report
            .runs
            .map(|n| format!(" runs={}", n))
            .unwrap_or_default()
    );
    for r in &report.cases {
        println!(
            "  {} | w={:.3} off={:.2} on={:.2} effect={:+.2}",
            r.case,
            r.weight,
            r.off,
            r.on,
            r.effect()
        );
    }
    println!(
        "  aggregate | off={:.2} on={:.2} effect={:+.2}",
        report.aggregate.off_total,
        report.aggregate.on_total,
        report.aggregate.effect()
    );
}
