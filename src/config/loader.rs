//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::LogConfig;
use crate::error::ConfigError;

/// Environment variable overriding `level`.
pub const ENV_LEVEL: &str = "CTXLOG_LEVEL";
/// Environment variable overriding `stdout`.
pub const ENV_STDOUT: &str = "CTXLOG_STDOUT";
/// Environment variable overriding `logDir`.
pub const ENV_LOG_DIR: &str = "CTXLOG_LOG_DIR";
/// Environment variable overriding `logFile`.
pub const ENV_LOG_FILE: &str = "CTXLOG_LOG_FILE";

/// Load configuration from a TOML file.
///
/// The settings may sit at the top level or inside a `[log]` table, so the
/// logger section can live in a larger application config.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    LogConfig::from_toml_str(&content)
}

impl LogConfig {
    /// Parse configuration from TOML text. See [`load_config`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(content)?;
        let section = match table.remove("log") {
            Some(toml::Value::Table(log)) => log,
            Some(other) => {
                table.insert("log".to_string(), other);
                table
            }
            None => table,
        };
        Ok(toml::Value::Table(section).try_into()?)
    }

    /// Apply `CTXLOG_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; unset or unparsable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup(ENV_LEVEL) {
            self.level = level;
        }
        if let Some(stdout) = lookup(ENV_STDOUT).as_deref().and_then(parse_bool) {
            self.stdout = stdout;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = dir;
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            self.log_file = file;
        }
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
