//! Leveled, structured logging facade with request-scoped fields.
//!
//! ```text
//! caller ─→ dispatch (infof!/errorf!/..) ─→ adapter (carrier kind) ─→ fields
//!                                                                     │
//! config ─→ level + sink ─→ logger::init (once) ─→ Logger ─→ Sink ◀───┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ctxlog::{infof, errorf, Carrier, LogConfig};
//!
//! ctxlog::init(LogConfig { level: "debug".into(), stdout: true, ..LogConfig::default() });
//!
//! let root = Carrier::new();
//! let ctx = root.with_string("request_id", "abc");
//! infof!(&ctx, "hello {}", "world");
//! errorf!(&ctx, "failed: {}", 500);
//!
//! ctxlog::flush();
//! ```

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fields;
pub mod level;
pub mod logger;
pub mod record;
pub mod sink;
pub mod truncate;

pub use adapter::{normalize, CarrierLike, RequestFieldsExt};
pub use config::{load_config, LogConfig};
pub use error::{ConfigError, ParseFieldError, SinkError};
pub use fields::{fields_of, with_fields, Carrier, Field, FieldValue};
pub use level::{resolve, Severity};
pub use logger::{flush, global, init, init_with, is_initialized, Logger};
pub use record::{Caller, LogRecord};
pub use sink::{Destination, Sink};
pub use truncate::{truncate_utf8, MAX_MESSAGE_BYTES, TRUNCATION_MARKER};
