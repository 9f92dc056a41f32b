//! Error types.
//!
//! None of these ever escape a logging call. They exist for the setup paths
//! (configuration loading, sink provisioning) where a caller can act on them.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to prepare a sink's destination.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The log directory could not be created.
    #[error("failed to create log dir {}: {source}", dir.display())]
    Provision {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be opened for appending.
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed `key=value` field text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseFieldError {
    #[error("expected key=value, got {0:?}")]
    MissingSeparator(String),

    #[error("empty field key in {0:?}")]
    EmptyKey(String),
}
