//! Logger state and the process-wide handle.
//!
//! # Responsibilities
//! - Hold the assembled sink and the minimum severity
//! - Initialize the global handle exactly once
//! - Flush buffered output at shutdown
//!
//! # Design Decisions
//! - [`Logger`] is a plain value: build one directly and pass it around, or
//!   commit one process-wide with [`init`]
//! - `init` is guarded by `OnceLock`: the first caller builds, concurrent callers
//!   wait for it, later callers get the committed logger back untouched
//! - Records logged after [`flush`] may not reach the destination

use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

use crate::config::LogConfig;
use crate::level::Severity;
use crate::record::LogRecord;
use crate::sink::{self, BuiltSink, Destination, Sink};

/// Assembled sink plus severity threshold.
pub struct Logger {
    sink: Box<dyn Sink>,
    threshold: Severity,
    destination: Destination,
    config: Option<LogConfig>,
}

impl Logger {
    /// Build a logger from configuration: resolve the level, build the sink.
    pub fn new(config: LogConfig) -> Self {
        let threshold = config.severity();
        let BuiltSink { sink, destination } = sink::build(&config);
        Self {
            sink,
            threshold,
            destination,
            config: Some(config),
        }
    }

    /// Build a logger around an existing sink.
    pub fn with_sink(sink: impl Sink + 'static, threshold: Severity) -> Self {
        let destination = Destination::Custom(format!("{:?}", sink));
        Self {
            sink: Box::new(sink),
            threshold,
            destination,
            config: None,
        }
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The configuration this logger was built from, if any.
    pub fn config(&self) -> Option<&LogConfig> {
        self.config.as_ref()
    }

    /// Whether records at `severity` pass the threshold.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    /// Hand `record` to the sink unless it is below the threshold.
    ///
    /// A failed write is reported on raw stderr and otherwise ignored.
    pub fn emit(&self, record: &LogRecord<'_>) {
        if !self.enabled(record.severity) {
            return;
        }
        if let Err(err) = self.sink.write_record(record) {
            let _ = writeln!(
                io::stderr().lock(),
                "ctxlog: write to {} failed: {}",
                self.destination,
                err
            );
        }
    }

    /// Block until buffered output reached the destination.
    pub fn flush(&self) {
        let _ = self.sink.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Initialize the process-wide logger from `config`.
///
/// Only the first call does any work. Every call, concurrent or later, returns
/// the committed logger; configurations passed after the first are ignored.
pub fn init(config: LogConfig) -> &'static Logger {
    GLOBAL.get_or_init(|| Logger::new(config))
}

/// Commit an already built logger as the process-wide one.
///
/// Same once-only rules as [`init`]: if a logger is already committed, `logger`
/// is dropped and the committed one returned.
pub fn init_with(logger: Logger) -> &'static Logger {
    GLOBAL.get_or_init(|| logger)
}

/// The committed process-wide logger, if [`init`] ran.
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Flush the process-wide logger. Call once at shutdown.
pub fn flush() {
    if let Some(logger) = global() {
        logger.flush();
    }
}
