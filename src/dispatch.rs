//! Leveled logging entry points.
//!
//! # Data Flow
//! ```text
//! info(carrier_like, format_args!(..))
//!     → CarrierLike (normalize once)
//!     → format + truncate to MAX_MESSAGE_BYTES
//!     → fields of the carrier
//!     → global logger committed? → route → Logger::emit → Sink
//!                         not yet → "[UNINIT] ..." on raw stderr
//! ```
//!
//! # Design Decisions
//! - Logging never fails the caller and never waits for initialization
//! - The entry point and `log_with_carrier` are both `#[track_caller]`, so the
//!   recorded location is the code calling the entry point
//! - Only debug/info/warn/error have entry points; routing any other severity
//!   is a bug in this module and panics

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;

use crate::adapter::CarrierLike;
use crate::fields::Field;
use crate::level::Severity;
use crate::logger::{self, Logger};
use crate::record::{Caller, LogRecord};
use crate::truncate::{truncate_utf8, MAX_MESSAGE_BYTES};

/// Prefix of records written before the logger was initialized.
pub const UNINIT_PREFIX: &str = "[UNINIT]";

/// Log at debug severity through the process-wide logger.
#[track_caller]
pub fn debug<'a>(carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
    log_with_carrier(logger::global(), carrier.into(), Severity::Debug, args);
}

/// Log at info severity through the process-wide logger.
#[track_caller]
pub fn info<'a>(carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
    log_with_carrier(logger::global(), carrier.into(), Severity::Info, args);
}

/// Log at warn severity through the process-wide logger.
#[track_caller]
pub fn warn<'a>(carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
    log_with_carrier(logger::global(), carrier.into(), Severity::Warn, args);
}

/// Log at error severity through the process-wide logger.
#[track_caller]
pub fn error<'a>(carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
    log_with_carrier(logger::global(), carrier.into(), Severity::Error, args);
}

/// The same entry points on an explicit logger, for code that passes one around
/// instead of using the process-wide handle.
impl Logger {
    #[track_caller]
    pub fn debug<'a>(&self, carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
        log_with_carrier(Some(self), carrier.into(), Severity::Debug, args);
    }

    #[track_caller]
    pub fn info<'a>(&self, carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
        log_with_carrier(Some(self), carrier.into(), Severity::Info, args);
    }

    #[track_caller]
    pub fn warn<'a>(&self, carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
        log_with_carrier(Some(self), carrier.into(), Severity::Warn, args);
    }

    #[track_caller]
    pub fn error<'a>(&self, carrier: impl Into<CarrierLike<'a>>, args: fmt::Arguments<'_>) {
        log_with_carrier(Some(self), carrier.into(), Severity::Error, args);
    }
}

#[track_caller]
fn log_with_carrier(
    logger: Option<&Logger>,
    carrier: CarrierLike<'_>,
    severity: Severity,
    args: fmt::Arguments<'_>,
) {
    let caller = Caller::from(Location::caller());
    if logger.is_some_and(|l| !l.enabled(severity)) {
        return;
    }

    let formatted: Cow<'_, str> = match args.as_str() {
        Some(literal) => Cow::Borrowed(literal),
        None => Cow::Owned(args.to_string()),
    };
    deliver(logger, severity, &formatted, carrier.fields(), Some(caller));
}

/// Truncate `message` and hand it to `logger`, or to the stderr fallback when
/// there is no logger yet.
pub(crate) fn deliver(
    logger: Option<&Logger>,
    severity: Severity,
    message: &str,
    fields: &[Field],
    caller: Option<Caller>,
) {
    let message = truncate_utf8(message, MAX_MESSAGE_BYTES);
    match logger {
        Some(logger) => {
            let mut record = LogRecord::new(severity, &message, fields);
            record.caller = caller;
            route(logger, &record);
        }
        None => {
            let _ = write_fallback(&mut io::stderr().lock(), &message, fields);
        }
    }
}

fn route(logger: &Logger, record: &LogRecord<'_>) {
    match record.severity {
        Severity::Debug | Severity::Info | Severity::Warn | Severity::Error => logger.emit(record),
        Severity::DPanic | Severity::Panic | Severity::Fatal => {
            unreachable!("no dispatch route for severity {}", record.severity)
        }
    }
}

/// `[UNINIT] <message>` followed by ` key=value` for each field.
fn write_fallback(out: &mut impl Write, message: &str, fields: &[Field]) -> io::Result<()> {
    let mut line = format!("{} {}", UNINIT_PREFIX, message);
    for field in fields {
        line.push(' ');
        line.push_str(&field.to_string());
    }
    line.push('\n');
    out.write_all(line.as_bytes())
}

/// Log at debug severity: `debugf!(carrier, "template {}", arg)`.
#[macro_export]
macro_rules! debugf {
    ($carrier:expr, $($arg:tt)+) => {
        $crate::dispatch::debug($carrier, format_args!($($arg)+))
    };
}

/// Log at info severity: `infof!(carrier, "template {}", arg)`.
#[macro_export]
macro_rules! infof {
    ($carrier:expr, $($arg:tt)+) => {
        $crate::dispatch::info($carrier, format_args!($($arg)+))
    };
}

/// Log at warn severity: `warnf!(carrier, "template {}", arg)`.
#[macro_export]
macro_rules! warnf {
    ($carrier:expr, $($arg:tt)+) => {
        $crate::dispatch::warn($carrier, format_args!($($arg)+))
    };
}

/// Log at error severity: `errorf!(carrier, "template {}", arg)`.
#[macro_export]
macro_rules! errorf {
    ($carrier:expr, $($arg:tt)+) => {
        $crate::dispatch::error($carrier, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Carrier;
    use crate::sink::ConsoleSink;
    use crate::truncate::TRUNCATION_MARKER;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn records(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn memory_logger(threshold: Severity) -> (Logger, SharedBuf) {
        let buf = SharedBuf::default();
        let logger = Logger::with_sink(ConsoleSink::from_writer("memory", buf.clone()), threshold);
        (logger, buf)
    }

    #[test]
    fn test_format_substitution() {
        let (logger, buf) = memory_logger(Severity::Debug);
        logger.info((), format_args!("hello {}", "world"));

        let records = buf.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "info");
        assert_eq!(records[0]["msg"], "hello world");
    }

    #[test]
    fn test_fields_from_carrier() {
        let (logger, buf) = memory_logger(Severity::Debug);
        let c1 = Carrier::new();
        let c2 = c1.with_string("request_id", "abc");
        logger.error(&c2, format_args!("failed: {}", 500));

        let records = buf.records();
        assert_eq!(records[0]["level"], "error");
        assert_eq!(records[0]["msg"], "failed: 500");
        assert_eq!(records[0]["request_id"], "abc");
        assert!(c1.fields().is_empty());
    }

    #[test]
    fn test_below_threshold_dropped() {
        let (logger, buf) = memory_logger(Severity::Warn);
        logger.debug((), format_args!("d"));
        logger.info((), format_args!("i"));
        logger.warn((), format_args!("w"));
        logger.error((), format_args!("e"));

        let msgs: Vec<String> = buf
            .records()
            .iter()
            .map(|r| r["msg"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(msgs, ["w", "e"]);
    }

    #[test]
    fn test_oversized_message_truncated() {
        let (logger, buf) = memory_logger(Severity::Debug);
        let big = "é".repeat(5_000);
        logger.info((), format_args!("{}", big));

        let records = buf.records();
        let msg = records[0]["msg"].as_str().unwrap();
        let body = msg.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.len(), MAX_MESSAGE_BYTES);
        assert!(body.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_caller_is_call_site() {
        let (logger, buf) = memory_logger(Severity::Debug);
        let line = line!() + 1;
        logger.warn((), format_args!("here"));

        let records = buf.records();
        let caller = records[0]["caller"].as_str().unwrap();
        assert_eq!(caller, format!("src/dispatch.rs:{}", line));
    }

    #[test]
    fn test_fallback_line_shape() {
        let mut out = Vec::new();
        let fields = [Field::string("request_id", "abc"), Field::int("n", 1)];
        write_fallback(&mut out, "hello world", &fields).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[UNINIT] hello world request_id=abc n=1\n"
        );
    }

    #[test]
    #[should_panic(expected = "no dispatch route for severity fatal")]
    fn test_route_rejects_undispatchable_severity() {
        let (logger, _buf) = memory_logger(Severity::Debug);
        route(&logger, &LogRecord::new(Severity::Fatal, "x", &[]));
    }
}
