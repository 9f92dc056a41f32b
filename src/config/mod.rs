//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, top level or [log] table)
//!     → loader.rs (parse & deserialize)
//!     → CTXLOG_* environment overrides
//!     → LogConfig (immutable)
//!     → logger::init (consumed once)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - An unknown level is not an error; it resolves to `info`
//! - Empty directory/file names fall back to `./logs` and `app.log`

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{LogConfig, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
