//! Tracing configuration for the formula CLI.
//!
//! All log output goes to stderr so that `--dry-run` can print the rendered
//! formula on stdout.

use std::io::{self, IsTerminal};
pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above (default)
    Info,
    /// Show warnings and above
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    pub level: Level,
    /// Explicit filter directives; `RUST_LOG` is used when unset
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Compact,
            level: Level::INFO,
            filter: None,
        }
    }
}

/// Filter directives enabling `level` for this tool's own crates.
fn default_directives(level: Level) -> String {
    let level_str = level.as_str().to_ascii_lowercase();
    format!("warn,update_formula={level_str},neokikoeru_formula={level_str}")
}

/// Initialize tracing with the given configuration
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let env_filter = if let Some(filter) = config.filter {
        EnvFilter::try_new(filter)
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directives(config.level)))
    }
    .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let ansi = io::stderr().is_terminal();

    let result = match config.format {
        TracingFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_ansi(ansi)
                    .with_target(true),
            )
            .try_init(),
        TracingFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(ansi)
                    .with_target(false),
            )
            .try_init(),
        TracingFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
    };
    result.map_err(|e| miette::miette!("Failed to initialize tracing: {e}"))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized"
    );

    Ok(())
}
