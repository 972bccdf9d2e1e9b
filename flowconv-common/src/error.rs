use thiserror::Error;

/// Common error type for flowconv components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON5 serialization error: {0}")]
    Json5(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid identifier {input:?}: {reason}")]
    Identifier { input: String, reason: String },

    #[error("Invalid reference: {0}")]
    Reference(String),

    #[error("Failed to decode {type_name}: {message}")]
    Decode { type_name: String, message: String },
}

impl From<json5::Error> for Error {
    fn from(e: json5::Error) -> Self {
        Error::Json5(e.to_string())
    }
}

/// Result type alias using flowconv's Error.
pub type Result<T> = std::result::Result<T, Error>;
