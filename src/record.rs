//! Ephemeral log records and their JSON-lines encoding.
//!
//! A [`LogRecord`] borrows its message and fields from the call that produced
//! it and is dropped as soon as the sink returns.

use std::fmt;
use std::io;
use std::panic::Location;

use chrono::{DateTime, Local, SecondsFormat};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::fields::Field;
use crate::level::Severity;

/// Source location a record is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    file: &'static str,
    line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    /// Short form: the last directory and the file name, e.g. `handlers/user.rs:42`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.replace('\\', "/");
        let short = match file.rmatch_indices('/').nth(1) {
            Some((idx, _)) => &file[idx + 1..],
            None => &file[..],
        };
        write!(f, "{}:{}", short, self.line)
    }
}

/// A single record on its way to a sink.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub caller: Option<Caller>,
    pub message: &'a str,
    pub fields: &'a [Field],
}

impl<'a> LogRecord<'a> {
    /// Record stamped with the current local time and no caller.
    pub fn new(severity: Severity, message: &'a str, fields: &'a [Field]) -> Self {
        Self {
            severity,
            timestamp: Local::now(),
            caller: None,
            message,
            fields,
        }
    }

    pub fn with_caller(mut self, caller: impl Into<Caller>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Encode as one JSON object followed by a newline.
    pub fn encode_line(&self) -> io::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self).map_err(io::Error::other)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Serialize for LogRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(
            "ts",
            &self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
        )?;
        map.serialize_entry("level", &self.severity)?;
        if let Some(caller) = &self.caller {
            map.serialize_entry("caller", &caller.to_string())?;
        }
        map.serialize_entry("msg", self.message)?;
        for field in self.fields {
            map.serialize_entry(field.key(), field.value())?;
        }
        map.end()
    }
}
