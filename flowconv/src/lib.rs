//! Converts a legacy agent configuration into a graph of typed components.
//!
//! # Usage
//!
//! ```bash
//! flowconv convert agent.json5 -o agent.flow --report report.txt
//! flowconv serve agent.json5 --listen 127.0.0.1:12345
//! ```
//!
//! # Configuration
//!
//! See [`config::ToolConfig`] for configuration options.

pub mod commands;
pub mod config;

pub use commands::{CommandError, Conversion};
pub use config::ToolConfig;
