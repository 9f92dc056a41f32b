//! Bridge from `tracing` events into the facade.
//!
//! Libraries such as axum and tower-http report through `tracing`. Installing
//! [`FacadeLayer`] routes those events into the same sink, with the same
//! threshold, truncation and fallback as direct facade calls.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::dispatch;
use crate::fields::Field;
use crate::level::Severity;
use crate::logger::{self, Logger};
use crate::record::Caller;

/// `tracing_subscriber` layer forwarding events to a facade logger.
#[derive(Debug, Clone, Default)]
pub struct FacadeLayer {
    logger: Option<Arc<Logger>>,
}

impl FacadeLayer {
    /// Forward to the process-wide logger (or the stderr fallback before init).
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward to an explicit logger.
    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    fn target(&self) -> Option<&Logger> {
        match &self.logger {
            Some(logger) => Some(logger.as_ref()),
            None => logger::global(),
        }
    }
}

impl<S: Subscriber> Layer<S> for FacadeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = severity_of(metadata.level());
        let target = self.target();
        if target.is_some_and(|l| !l.enabled(severity)) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        visitor
            .fields
            .push(Field::string("target", metadata.target()));

        let caller = metadata
            .file()
            .zip(metadata.line())
            .map(|(file, line)| Caller::new(file, line));
        dispatch::deliver(target, severity, &visitor.message, &visitor.fields, caller);
    }
}

/// Map a `tracing` level onto the facade's severities.
pub fn severity_of(level: &Level) -> Severity {
    match *level {
        Level::TRACE | Level::DEBUG => Severity::Debug,
        Level::INFO => Severity::Info,
        Level::WARN => Severity::Warn,
        Level::ERROR => Severity::Error,
    }
}

/// Install [`FacadeLayer`] as the global `tracing` subscriber.
///
/// `RUST_LOG` filters events before they reach the layer; without it the filter
/// follows the committed logger's threshold. Returns `false` when a global
/// subscriber was already set.
pub fn install() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(FacadeLayer::new())
        .try_init()
        .is_ok()
}

fn default_directive() -> &'static str {
    match logger::global().map(Logger::threshold) {
        Some(Severity::Debug) => "debug",
        Some(Severity::Info) | None => "info",
        Some(Severity::Warn) => "warn",
        Some(_) => "error",
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::string(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        match i64::try_from(value) {
            Ok(v) => self.fields.push(Field::int(field.name(), v)),
            Err(_) => self.fields.push(Field::string(field.name(), value.to_string())),
        }
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(Field::string(field.name(), format!("{:?}", value)));
        }
    }
}
