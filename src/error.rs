//! Error types for conduit-connectors
//!
//! Every failure surfaced by a registry, connector or source service is
//! classified into one of the kinds below before it reaches the caller.
//! Nothing is retried internally.

use thiserror::Error;

/// Result type for conduit operations
pub type ConduitResult<T> = std::result::Result<T, ConduitError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConduitError {
    /// No handler registered for a protocol or source type
    #[error("no {kind} registered for '{key}'")]
    NotFound { kind: &'static str, key: String },

    /// Transport could not be established
    #[error("connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Required context property missing or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Payload does not match the expected shape
    #[error("format error: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Wrapped failure from the underlying transport or decoder
    #[error("source error: {message}")]
    Source {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Operation not provided by this source service
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl ConduitError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn connection_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            source: None,
        }
    }

    pub fn format_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Format {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
            source: None,
        }
    }

    pub fn source_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Whether the failure came from a missing registry entry
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
