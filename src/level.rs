//! Severity levels and level-string resolution.
//!
//! # Design Decisions
//! - Total order: debug < info < warn < error < dpanic < panic < fatal
//! - Resolution never fails: anything unrecognized becomes `Info`
//! - `"warning"` is accepted as a synonym for `warn`

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Ordered log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Development panic: logged like an error, reserved for "should never happen".
    DPanic,
    Panic,
    Fatal,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    /// Lowercase name as written into encoded records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(resolve(s))
    }
}

/// Map a free-form level string to a [`Severity`].
///
/// Surrounding whitespace is trimmed and letter case ignored. Unknown input
/// resolves to [`Severity::Info`].
pub fn resolve(text: &str) -> Severity {
    match text.trim().to_ascii_lowercase().as_str() {
        "debug" => Severity::Debug,
        "info" => Severity::Info,
        "warn" | "warning" => Severity::Warn,
        "error" => Severity::Error,
        "dpanic" => Severity::DPanic,
        "panic" => Severity::Panic,
        "fatal" => Severity::Fatal,
        _ => Severity::Info,
    }
}
