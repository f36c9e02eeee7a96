use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the terminology context.
///
/// A code that is simply not part of a value set is *not* an error: it is
/// reported through [`ValidationResult`](crate::types::ValidationResult).
/// These variants cover the cases where the context could not even look.
#[derive(Error, Debug)]
pub enum TerminologyError {
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Load error: {message}")]
    Load {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerminologyError {
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary failure as an internal error, keeping it as the source.
    pub fn internal_from(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
            path: None,
        }
    }

    pub fn load_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Load {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Nothing in this crate is transient. Every failure is a final answer
    /// for the given input.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

pub type Result<T> = std::result::Result<T, TerminologyError>;
