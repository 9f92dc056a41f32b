//! Shared utilities for integration tests.

use std::path::Path;
use std::process::{Command, Output};

/// Environment variable marking a re-executed child test process.
pub const CHILD_ENV: &str = "CTXLOG_TEST_CHILD";

/// Whether this process is the re-executed child of `run_child`.
#[allow(dead_code)]
pub fn is_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

/// Re-run the current test binary, executing only `test_name`, and capture its output.
///
/// Needed for scenarios that must start from a fresh process-wide logger or that
/// assert on raw stderr output.
#[allow(dead_code)]
pub fn run_child(test_name: &str) -> Output {
    let exe = std::env::current_exe().expect("current test executable");
    Command::new(exe)
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .expect("spawn child test process")
}

/// Parse every line of `text` that is a JSON object.
#[allow(dead_code)]
pub fn json_lines(text: &str) -> Vec<serde_json::Value> {
    text.lines()
        .filter(|l| l.starts_with('{'))
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect()
}

/// Parse a JSON-lines log file.
#[allow(dead_code)]
pub fn read_log(path: &Path) -> Vec<serde_json::Value> {
    let text = std::fs::read_to_string(path).expect("read log file");
    json_lines(&text)
}
