//! Emit a single structured record from the shell.
//!
//! ```text
//! ctxlog-emit --stdout error "payment failed" -f order_id=42 -f retry=false
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use ctxlog::{debugf, errorf, infof, warnf, Carrier, Field, LogConfig};

#[derive(Parser)]
#[command(name = "ctxlog-emit")]
#[command(about = "Write one log record through ctxlog", long_about = None)]
struct Cli {
    /// TOML file with the logger configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum level (overrides the config file).
    #[arg(long)]
    level: Option<String>,

    /// Write to stdout instead of the log file.
    #[arg(long)]
    stdout: bool,

    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long)]
    log_file: Option<String>,

    /// Structured field as key=value; repeatable.
    #[arg(short = 'f', long = "field")]
    fields: Vec<Field>,

    #[arg(value_enum)]
    severity: EmitLevel,

    message: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmitLevel {
    Debug,
    Info,
    Warn,
    Error,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ctxlog::load_config(path)?,
        None => LogConfig::default(),
    }
    .with_env_overrides();

    if let Some(level) = cli.level {
        config.level = level;
    }
    if cli.stdout {
        config.stdout = true;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }
    if let Some(file) = cli.log_file {
        config.log_file = file;
    }

    ctxlog::init(config);
    let carrier = Carrier::new().with_fields(cli.fields);

    match cli.severity {
        EmitLevel::Debug => debugf!(&carrier, "{}", cli.message),
        EmitLevel::Info => infof!(&carrier, "{}", cli.message),
        EmitLevel::Warn => warnf!(&carrier, "{}", cli.message),
        EmitLevel::Error => errorf!(&carrier, "{}", cli.message),
    }

    ctxlog::flush();
    Ok(())
}
