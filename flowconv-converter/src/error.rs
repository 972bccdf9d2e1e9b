//! Error types for the converter.

use thiserror::Error;

/// Result type alias using [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Unexpected conversion failures.
///
/// Anything the converter merely cannot reproduce is reported as a
/// diagnostic instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A name could not be turned into a component label.
    #[error("Invalid label for {what}: {source}")]
    Label {
        what: String,
        #[source]
        source: flowconv_common::Error,
    },

    /// Component arguments could not be encoded.
    #[error("Failed to encode arguments of {component}: {source}")]
    Encode {
        component: String,
        #[source]
        source: serde_json::Error,
    },

    /// An untyped fragment did not match its typed schema.
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: flowconv_common::Error,
    },

    /// I/O error while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create a label error.
    pub fn label(what: impl Into<String>, source: flowconv_common::Error) -> Self {
        Self::Label {
            what: what.into(),
            source,
        }
    }

    /// Create a decode error.
    pub fn decode(what: impl Into<String>, source: flowconv_common::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }
}
