// src/logging.rs
//
// Diagnostic logging for the report binaries.
//
// Everything goes to stderr so stdout only carries the console summary.
// BENCH_RESULTS_LOG takes an EnvFilter directive and wins over `verbose`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "BENCH_RESULTS_LOG";

/// Default filter directive for the given verbosity.
///
/// Covers the library and both binaries, which log under their own names.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bench_results=debug,generate_results=debug,aggregate_results=debug,warn"
    } else {
        "bench_results=info,generate_results=info,aggregate_results=info,warn"
    }
}

/// Install the global subscriber. Repeated calls are no-ops.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
