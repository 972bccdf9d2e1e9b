//! flowconv Converter
//!
//! Turns a legacy monolithic agent configuration into a graph of typed,
//! addressable components wired together by symbolic references:
//!
//! - [`legacy`] - The legacy configuration tree (serde model)
//! - [`validate`] - Validators reporting what cannot be converted
//! - [`component`] - Arguments of the emitted components
//! - [`convert`] - Per-family converters and the top-level [`convert()`]
//! - [`build`] - Block assembly and rendering
//! - [`defaults`] - Platform-specific exporter defaults
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use flowconv_converter::{ConvertOptions, LegacyConfig, convert};
//!
//! let cfg: LegacyConfig = flowconv_common::load_config("agent.json5")?;
//! let (file, diags) = convert(&cfg, &ConvertOptions::default());
//! print!("{}", file.render());
//! eprint!("{}", diags.report());
//! ```

pub mod build;
pub mod component;
pub mod convert;
pub mod defaults;
pub mod error;
pub mod legacy;
pub mod validate;

// Re-export commonly used types at the crate root
pub use build::{Block, File, PrometheusBlocks};
pub use convert::{ConvertOptions, convert};
pub use defaults::{Platform, PlatformDefaults};
pub use error::{ConvertError, Result};
pub use legacy::LegacyConfig;
pub use validate::validate;
