//! Path resolution against the codec's schema.

use restconf_core::{CodecError, DocumentCodec, ResourceId, UriPath};

use crate::error::{RestconfError, Result};

/// Resolve a request path to the identifier of the node it names.
pub fn resolve<C: DocumentCodec + ?Sized>(codec: &C, path: &UriPath) -> Result<ResourceId> {
    codec
        .path_to_resource_id(path)
        .map_err(|e| malformed_path(path, e))
}

/// The path with its final segment dropped. Fails for the root.
pub fn parent_of(path: &UriPath) -> Result<UriPath> {
    path.parent().map_err(|e| RestconfError::MalformedPath {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Path a replace or merge document is parsed at: the parent of `path`, or
/// the root itself when `path` is the root.
pub(crate) fn parse_context(path: &UriPath) -> UriPath {
    parent_of(path).unwrap_or_else(|_| UriPath::root())
}

pub(crate) fn malformed_path(path: &UriPath, e: CodecError) -> RestconfError {
    let message = match e {
        CodecError::MalformedPath { message, .. } => message,
        other => other.to_string(),
    };
    RestconfError::MalformedPath {
        path: path.to_string(),
        message,
    }
}
