//! Error types for the RESTCONF manager.

use restconf_core::{CodecError, ModelError, StoreError};
use thiserror::Error;

/// Errors returned by manager operations.
#[derive(Debug, Error)]
pub enum RestconfError {
    /// The request path does not name a node in the schema.
    #[error("malformed path '{path}': {message}")]
    MalformedPath { path: String, message: String },

    /// The request document was rejected by the codec.
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// The configuration store failed. Not retried.
    #[error("store failed to {operation}: {source}")]
    StoreFailure {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A node read from the store could not be encoded.
    #[error("failed to encode response: {0}")]
    ResponseEncoding(#[source] CodecError),

    /// A model value could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The request method has no RESTCONF operation.
    #[error("unsupported method: {method}")]
    UnsupportedVerb { method: String },

    /// The manager configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The RPC worker pool could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl RestconfError {
    /// Check if this is a server-side error rather than a bad request.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            RestconfError::MalformedPath { .. }
                | RestconfError::MalformedDocument { .. }
                | RestconfError::UnsupportedVerb { .. }
        )
    }
}

/// Result type alias for manager operations.
pub type Result<T> = std::result::Result<T, RestconfError>;
