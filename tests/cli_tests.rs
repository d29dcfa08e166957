// tests/cli_tests.rs
//
// Integration tests that execute the compiled binaries, checking argument
// handling, exit codes and the report written to disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn generate_bin() -> &'static str {
    env!("CARGO_BIN_EXE_generate_results")
}

fn aggregate_bin() -> &'static str {
    env!("CARGO_BIN_EXE_aggregate_results")
}

/// Combined stdout and stderr, for assertion messages.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr)
}

fn write_result(dir: &Path, name: &str, score: f64) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), format!(r#"{{"score": {score}}}"#)).unwrap();
}

#[test]
fn aggregate_writes_report_with_run_count() {
    let temp = tempdir().unwrap();
    let base = temp.path();
    let runs = base.join("runs");

    write_result(&runs.join("run_a").join("caseX"), "off.json", 2.0);
    write_result(&runs.join("run_a").join("caseX"), "on.json", 5.0);
    write_result(&runs.join("run_b").join("caseX"), "off.json", 4.0);
    write_result(&runs.join("run_b").join("caseX"), "on.json", 7.0);
    fs::write(base.join("weights.json"), r#"{"caseX": 1, "ghost": 1}"#).unwrap();

    let out = base.join("report").join("RESULTS.md");
    let output = Command::new(aggregate_bin())
        .arg("--input-dir")
        .arg(&runs)
        .arg("--weights")
        .arg(base.join("weights.json"))
        .arg("--output")
        .arg(&out)
        .env_remove("BENCH_RESULTS_RULE")
        .output()
        .expect("Failed to execute aggregate_results");

    assert!(output.status.success(), "{}", combined_output(&output));
    let md = fs::read_to_string(&out).unwrap();
    assert!(md.contains("Runs aggregated: `2`"));
    assert!(md.contains("| caseX | 3.00 | 6.00 | +3.00 |"));
    // ghost has weight 1/2 and is missing, so totals are halved.
    assert!(md.contains("- Off: `1.50`"));
    assert!(md.contains("- Effectiveness: `+1.50`"));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ghost"),
        "expected a warning for the skipped case:\n{}",
        combined_output(&output)
    );
}

#[test]
fn aggregate_rejects_invalid_weights() {
    let temp = tempdir().unwrap();
    let base = temp.path();
    fs::create_dir_all(base.join("runs")).unwrap();
    fs::write(base.join("weights.json"), r#"{"a": 0}"#).unwrap();
    let out = base.join("RESULTS.md");

    let output = Command::new(aggregate_bin())
        .arg("--input-dir")
        .arg(base.join("runs"))
        .arg("--weights")
        .arg(base.join("weights.json"))
        .arg("--output")
        .arg(&out)
        .output()
        .expect("Failed to execute aggregate_results");

    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(!out.exists());
}

#[test]
fn aggregate_requires_input_dir() {
    let output = Command::new(aggregate_bin())
        .arg("--output")
        .arg("RESULTS.md")
        .output()
        .expect("Failed to execute aggregate_results");

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[test]
fn generate_requires_output() {
    let output = Command::new(generate_bin())
        .output()
        .expect("Failed to execute generate_results");

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[cfg(unix)]
#[test]
fn generate_runs_cases_and_writes_report() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("python");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("weights.json"), r#"{"a": 1, "b": 1}"#).unwrap();
    fs::write(
        root.join("a").join("run.sh"),
        "echo '{\"score\": 1}' > off.json\necho '{\"score\": 3}' > on.json\n",
    )
    .unwrap();
    fs::write(
        root.join("b").join("run.sh"),
        "echo '{\"score\": 2}' > off.json\necho '{\"score\": 2}' > on.json\n",
    )
    .unwrap();

    let out = temp.path().join("RESULTS.md");
    let output = Command::new(generate_bin())
        .arg("--cases-root")
        .arg(&root)
        .arg("--runner")
        .arg("sh")
        .arg("--runner-arg")
        .arg("run.sh")
        .arg("--output")
        .arg(&out)
        .env_remove("BENCH_RESULTS_RUNNER")
        .env_remove("BENCH_RESULTS_RULE")
        .env_remove("BENCH_RESULTS_LANGUAGE")
        .env_remove("BENCH_RESULTS_BENCHMARK_REPO")
        .output()
        .expect("Failed to execute generate_results");

    assert!(output.status.success(), "{}", combined_output(&output));
    let md = fs::read_to_string(&out).unwrap();
    assert!(md.starts_with("# Results: `TDD` (python)\n"));
    assert!(md.contains("- Off: `1.50`"));
    assert!(md.contains("- On: `2.50`"));
    assert!(md.contains("- Effectiveness: `+1.00`"));
}

#[cfg(unix)]
#[test]
fn generate_propagates_runner_exit_code() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("weights.json"), r#"{"a": 1}"#).unwrap();
    let out = root.join("RESULTS.md");

    let output = Command::new(generate_bin())
        .arg("--cases-root")
        .arg(root)
        .arg("--runner")
        .arg("sh")
        .arg("--runner-arg")
        .arg("-c")
        .arg("--runner-arg")
        .arg("exit 4")
        .arg("--output")
        .arg(&out)
        .output()
        .expect("Failed to execute generate_results");

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(!out.exists());
}

#[test]
fn aggregate_verbose_logs_binary_progress_without_colour() {
    let temp = tempdir().unwrap();
    let base = temp.path();
    write_result(&base.join("runs").join("a"), "off.json", 1.0);
    write_result(&base.join("runs").join("a"), "on.json", 2.0);
    fs::write(base.join("weights.json"), r#"{"a": 1}"#).unwrap();

    let output = Command::new(aggregate_bin())
        .arg("-v")
        .arg("--input-dir")
        .arg(base.join("runs"))
        .arg("--weights")
        .arg(base.join("weights.json"))
        .arg("--output")
        .arg(base.join("RESULTS.md"))
        .env_remove("BENCH_RESULTS_LOG")
        .output()
        .expect("Failed to execute aggregate_results");

    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("collected results"), "stderr:\n{stderr}");
    assert!(stderr.contains("averaged case scores"), "stderr:\n{stderr}");
    // stderr is a pipe here, so no escape sequences.
    assert!(!stderr.contains('\u{1b}'), "stderr:\n{stderr}");
}

#[test]
fn aggregate_rejects_non_finite_empty_average() {
    let temp = tempdir().unwrap();
    let base = temp.path();
    fs::create_dir_all(base.join("runs")).unwrap();
    fs::write(base.join("weights.json"), r#"{"a": 1}"#).unwrap();

    for bad in ["NaN", "inf", "-inf"] {
        let out = base.join("RESULTS.md");
        let output = Command::new(aggregate_bin())
            .arg("--input-dir")
            .arg(base.join("runs"))
            .arg("--weights")
            .arg(base.join("weights.json"))
            .arg("--output")
            .arg(&out)
            .arg(format!("--empty-average={bad}"))
            .output()
            .expect("Failed to execute aggregate_results");

        assert_eq!(output.status.code(), Some(2), "{bad}: {}", combined_output(&output));
        assert!(!out.exists());
    }
}
