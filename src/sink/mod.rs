//! Record destinations.
//!
//! # Data Flow
//! ```text
//! LogConfig
//!     → stdout = true  → ConsoleSink(stdout)
//!     → stdout = false → RotatingFileSink::open(log_dir/log_file)
//!         (create parent dirs, open for append)
//!         → ok  → RotatingFileSink
//!         → err → one-line warning on raw stderr → ConsoleSink(stderr)
//!     → TeeSink::combine(sinks)
//! ```
//!
//! # Design Decisions
//! - Provisioning happens once, at build time, never on the logging path
//! - The provisioning warning bypasses the logger: the logger is what failed
//! - Every sink serializes its own writes; poisoned locks are recovered

mod console;
mod file;
mod tee;

pub use console::ConsoleSink;
pub use file::{RotatingFileSink, RotationPolicy, ROTATION_POLICY};
pub use tee::TeeSink;

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::LogConfig;
use crate::error::SinkError;
use crate::record::LogRecord;

/// A destination for finished records.
pub trait Sink: Send + Sync + fmt::Debug {
    /// Write one record. Implementations must be safe to call concurrently.
    fn write_record(&self, record: &LogRecord<'_>) -> io::Result<()>;

    /// Block until buffered output reached the destination.
    fn flush(&self) -> io::Result<()>;
}

/// Where records end up, as decided at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    /// The log file could not be provisioned or opened; records go to stderr.
    StderrFallback,
    File(PathBuf),
    /// A sink handed in directly rather than built from configuration.
    Custom(String),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("stdout"),
            Destination::StderrFallback => f.write_str("stderr (fallback)"),
            Destination::File(path) => write!(f, "file {}", path.display()),
            Destination::Custom(name) => write!(f, "custom {}", name),
        }
    }
}

/// A sink together with a description of where it writes.
#[derive(Debug)]
pub struct BuiltSink {
    pub sink: Box<dyn Sink>,
    pub destination: Destination,
}

/// Build the sink selected by `config`.
///
/// Never fails: a log file whose directory cannot be created, or which cannot be
/// opened, is reported on stderr and replaced by a stderr sink.
pub fn build(config: &LogConfig) -> BuiltSink {
    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    let destination;

    if config.stdout {
        sinks.push(Box::new(ConsoleSink::stdout()));
        destination = Destination::Stdout;
    } else {
        let dir = config.effective_log_dir();
        let file_name = config.effective_log_file();

        match RotatingFileSink::open(&dir, &file_name, ROTATION_POLICY) {
            Ok(sink) => {
                destination = Destination::File(sink.path().to_path_buf());
                sinks.push(Box::new(sink));
            }
            Err(err) => {
                let _ = writeln!(io::stderr().lock(), "{}", err);
                sinks.push(Box::new(ConsoleSink::stderr()));
                destination = Destination::StderrFallback;
            }
        }
    }

    BuiltSink {
        sink: TeeSink::combine(sinks),
        destination,
    }
}

/// Create `dir` and its parents if missing.
pub fn provision_dir(dir: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(dir).map_err(|source| SinkError::Provision {
        dir: dir.to_path_buf(),
        source,
    })
}

pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
