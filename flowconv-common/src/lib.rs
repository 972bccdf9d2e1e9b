//! flowconv Common Library
//!
//! Shared types for the config converter and the component runtime:
//!
//! - [`diag`] - Conversion diagnostics (`Severity`, `Diagnostic`, `Diagnostics`)
//! - [`target`] - Scrape target label sets
//! - [`reference`] - Symbolic references between components and their resolution
//! - [`label`] - Component label sanitizing
//! - [`serialization`] - JSON/JSON5 encoding and untyped-fragment decoding
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod diag;
pub mod error;
pub mod label;
pub mod reference;
pub mod serialization;
pub mod target;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, load_config, parse_config};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use label::{is_valid_identifier, label_with_index, sanitize_identifier};
pub use reference::{ExportTable, Reference};
pub use serialization::{Format, decode, decode_untyped, encode};
pub use target::Target;

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// # Example
///
/// ```ignore
/// use flowconv_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
