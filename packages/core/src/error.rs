//! Error types for the core layer.
//!
//! Each collaborator seam gets its own error enum so callers can tell a bad
//! request path apart from a codec rejection or a store failure.

use thiserror::Error;

use crate::resource_id::ResourceId;

/// Errors raised while parsing or manipulating a [`UriPath`](crate::UriPath).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path segment is not a valid `[module:]name[=keys]` segment.
    #[error("invalid path segment '{segment}' at position {position}: {message}")]
    InvalidSegment {
        segment: String,
        position: usize,
        message: String,
    },

    /// The root path has no parent.
    #[error("the root path has no parent")]
    NoParent,

    /// A full request URL does not live under the RESTCONF root.
    #[error("path '{path}' is outside the RESTCONF root '{root}'")]
    OutsideRoot { path: String, root: String },
}

/// Errors raised while building model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An operation needed at least one node key but the identifier is empty.
    #[error("cannot {operation} on an empty resource identifier")]
    EmptyIdentifier { operation: &'static str },

    /// A key leaf was added after a key that cannot carry key leaves.
    #[error("node '{name}' cannot carry key leaves")]
    NotAList { name: String },
}

/// Failure signalled by a configuration store.
///
/// The manager treats every variant uniformly as an internal error; the
/// variants exist so store implementations and logs can say what went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The addressed node does not exist.
    #[error("node does not exist: {id}")]
    NotFound { id: ResourceId },

    /// A create targeted a node that already exists.
    #[error("node already exists: {id}")]
    AlreadyExists { id: ResourceId },

    /// The parent of a write does not exist or cannot hold children.
    #[error("invalid parent node: {id}")]
    InvalidParent { id: ResourceId },

    /// No remote procedure is registered at the identifier.
    #[error("no RPC registered at {id}")]
    RpcNotFound { id: ResourceId },

    /// An in-flight operation was cancelled before it completed.
    #[error("operation interrupted")]
    Interrupted,

    /// Any other store-side failure.
    #[error("{message}")]
    Failed { message: String },
}

impl StoreError {
    /// Create a generic failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        StoreError::Failed {
            message: message.into(),
        }
    }
}

/// Errors raised by a document codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The request path could not be matched against the schema.
    #[error("malformed path '{path}': {message}")]
    MalformedPath { path: String, message: String },

    /// The document names a node the schema does not know.
    #[error("unknown node '{name}' under '{parent}'")]
    UnknownNode { name: String, parent: String },

    /// A leaf value does not fit its schema type.
    #[error("invalid value for leaf '{leaf}': {message}")]
    InvalidValue { leaf: String, message: String },

    /// The document is structurally wrong (e.g. not an object).
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    /// A model value could not be built.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<PathError> for CodecError {
    fn from(e: PathError) -> Self {
        CodecError::MalformedPath {
            path: String::new(),
            message: e.to_string(),
        }
    }
}
