//! Configuration schema.
//!
//! Field names follow the camelCase keys used in existing deployment files
//! (`level`, `stdout`, `logDir`, `logFile`); snake_case spellings are accepted too.

use std::path::PathBuf;

use serde::Deserialize;

use crate::level::{self, Severity};

/// Directory used when `log_dir` is empty.
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// File name used when `log_file` is empty.
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Logger configuration, consumed once by [`crate::logger::init`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum severity: debug/info/warn/error/dpanic/panic/fatal.
    pub level: String,

    /// Write to standard output instead of a rotating file.
    #[serde(alias = "useConsole", alias = "use_console")]
    pub stdout: bool,

    /// Directory for the rotating file.
    #[serde(alias = "log_dir")]
    pub log_dir: String,

    /// File name within `log_dir`.
    #[serde(alias = "log_file", alias = "logFileName")]
    pub log_file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: false,
            log_dir: DEFAULT_LOG_DIR.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl LogConfig {
    /// Resolved minimum severity.
    pub fn severity(&self) -> Severity {
        level::resolve(&self.level)
    }

    pub fn effective_log_dir(&self) -> PathBuf {
        if self.log_dir.trim().is_empty() {
            PathBuf::from(DEFAULT_LOG_DIR)
        } else {
            PathBuf::from(&self.log_dir)
        }
    }

    pub fn effective_log_file(&self) -> String {
        if self.log_file.trim().is_empty() {
            DEFAULT_LOG_FILE.to_string()
        } else {
            self.log_file.clone()
        }
    }
}
