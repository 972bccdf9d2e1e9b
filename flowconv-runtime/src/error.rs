//! Error types for the component runtime.

use thiserror::Error;

/// Result type alias using [`RuntimeError`].
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur while building, updating or running components.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Component arguments did not match the component's schema.
    #[error("Invalid arguments for {component}: {message}")]
    Arguments { component: String, message: String },

    /// The integration could not be created from valid arguments.
    #[error("Failed to build integration {integration}: {message}")]
    Build { integration: String, message: String },

    /// The integration failed while running.
    #[error("Integration error: {0}")]
    Integration(String),

    /// No component is registered under this name.
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A component with this id already exists.
    #[error("Duplicate component id: {0}")]
    DuplicateComponent(String),

    /// `run` was called on a component that is already running or stopped.
    #[error("Component {0} cannot be run twice")]
    AlreadyRunning(String),

    /// Metrics could not be encoded.
    #[error("Failed to encode metrics: {0}")]
    Encode(String),

    /// Common library error.
    #[error(transparent)]
    Common(#[from] flowconv_common::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Create an arguments error.
    pub fn arguments(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Arguments {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a build error.
    pub fn build(integration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Build {
            integration: integration.into(),
            message: message.into(),
        }
    }

    /// Create an integration error.
    pub fn integration(msg: impl Into<String>) -> Self {
        Self::Integration(msg.into())
    }
}
