//! Unified error type for the client.
//!
//! Every failure is scoped to the single call that produced it; a client
//! instance remains usable after any error.

use crate::types::ModelType;
use thiserror::Error;

/// Errors surfaced by both transport adapters.
#[derive(Debug, Error)]
pub enum Error {
    /// A model-type-specific verb was invoked against the wrong model.
    #[error("{expected} model required, but the server is serving a {actual} model")]
    TypeMismatch {
        expected: ModelType,
        actual: ModelType,
    },

    /// A streaming exchange ended before every response was collected.
    #[error("response stream closed after {received} of {expected} responses")]
    StreamTruncated { received: usize, expected: usize },

    /// The server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    /// Underlying transport failure, passed through unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response payload did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// The requested input shape is not representable on this transport.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Client construction failed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

/// Low-level transport failures wrapped by [`Error::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "grpc")]
    #[error("RPC status: {0}")]
    Rpc(#[from] tonic::Status),

    #[cfg(feature = "grpc")]
    #[error("connection error: {0}")]
    Connection(#[from] tonic::transport::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::Http(err))
    }
}

#[cfg(feature = "grpc")]
impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Error::Transport(TransportError::Rpc(status))
    }
}

#[cfg(feature = "grpc")]
impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Error::Transport(TransportError::Connection(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode {
            message: err.to_string(),
        }
    }
}
