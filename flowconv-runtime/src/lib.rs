//! flowconv Runtime
//!
//! Live components with hot reload and cancellation:
//!
//! - [`component`] - The component contract (`Component`, `Options`, `Registration`)
//! - [`exporter`] - Adapter running a legacy integration as a reloadable component
//! - [`host`] - Builds components, collects exports, serves handlers
//! - [`http`] - Metrics routers and the host router
//! - [`instance`] - Instance key helpers
//! - [`integrations`] - Built-in integrations
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flowconv_runtime::Host;
//! use tokio_util::sync::CancellationToken;
//!
//! let host = Arc::new(Host::with_builtin("127.0.0.1:12345"));
//! host.build("prometheus.exporter.self", "agent", serde_json::json!({}))?;
//! host.serve("127.0.0.1:12345".parse()?, CancellationToken::new()).await?;
//! ```

pub mod component;
pub mod error;
pub mod exporter;
pub mod host;
pub mod http;
pub mod instance;
pub mod integrations;

// Re-export commonly used types at the crate root
pub use component::{Arguments, Component, OnStateChange, Options, Registration};
pub use error::{Result, RuntimeError};
pub use exporter::{Creator, ExporterComponent, ExporterExports, Integration, Phase};
pub use host::Host;
