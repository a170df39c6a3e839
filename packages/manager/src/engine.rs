//! The resource operation engine: CRUD requests translated into store calls.
//!
//! Every operation resolves or parses its target through the codec, then
//! issues exactly one existence check and at most one mutating store call.
//! Operations run on the caller; none of them touch the RPC worker pool.

use std::sync::Arc;

use restconf_core::{
    CodecError, ConfigStore, DataNode, DataNodeType, Document, DocumentCodec, Filter, InnerNode,
    ModelError, NodeKey, ResourceData, ResourceId, SchemaId, StoreError, UriPath,
};
use tracing::{debug, error, warn};

use crate::error::{RestconfError, Result};
use crate::resolver;

/// Translates RESTCONF resource operations into configuration store calls.
pub struct ResourceEngine<S, C> {
    store: Arc<S>,
    codec: Arc<C>,
}

impl<S, C> Clone for ResourceEngine<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<S: ConfigStore, C: DocumentCodec> ResourceEngine<S, C> {
    pub fn new(store: Arc<S>, codec: Arc<C>) -> Self {
        Self { store, codec }
    }

    /// Read the node at `path`.
    ///
    /// A node that does not exist is reported as `Ok(None)`.
    pub fn get(&self, path: &UriPath) -> Result<Option<Document>> {
        let id = resolver::resolve(&*self.codec, path)?;
        if !self.store_call("check existence", &id, || self.store.exists(&id))? {
            debug!(path = %path, "Read of nonexistent node");
            return Ok(None);
        }

        // Nothing narrows the read yet; stores return the whole subtree.
        let filter = Filter::new();
        let node = self.store_call("read", &id, || self.store.read(&id, &filter))?;
        let document = self
            .codec
            .resource_data_to_document(&id, &node)
            .map_err(RestconfError::ResponseEncoding)?;
        Ok(Some(document))
    }

    /// Create the node carried by `document` beneath `path`.
    pub fn post(&self, path: &UriPath, document: &Document) -> Result<()> {
        let data = self.parse(path, document)?;
        let (id, node) = normalize(data, path)?;
        self.store_call("create", &id, || self.store.create(&id, node))
    }

    /// Replace the node at `path`, creating it if it does not exist.
    pub fn put(&self, path: &UriPath, document: &Document) -> Result<()> {
        let target = resolver::resolve(&*self.codec, path)?;
        let data = self.parse(&resolver::parse_context(path), document)?;
        let (parent, node) = normalize(data, path)?;

        if self.store_call("check existence", &target, || self.store.exists(&target))? {
            self.store_call("replace", &parent, || self.store.replace(&parent, node))
        } else {
            self.store_call("create", &parent, || self.store.create(&parent, node))
        }
    }

    /// Merge the node carried by `document` into the tree.
    pub fn patch(&self, path: &UriPath, document: &Document) -> Result<()> {
        let data = self.parse(&resolver::parse_context(path), document)?;
        let (id, node) = normalize(data, path)?;
        self.store_call("update", &id, || self.store.update(&id, node))
    }

    /// Delete the node at `path`. Deleting a nonexistent node succeeds.
    pub fn delete(&self, path: &UriPath) -> Result<()> {
        let id = resolver::resolve(&*self.codec, path)?;
        if !self.store_call("check existence", &id, || self.store.exists(&id))? {
            debug!(path = %path, "Delete of nonexistent node");
            return Ok(());
        }
        self.store_call("delete", &id, || self.store.delete(&id))
    }

    fn parse(&self, path: &UriPath, document: &Document) -> Result<ResourceData> {
        self.codec
            .document_to_resource_data(path, document)
            .map_err(|e| match e {
                CodecError::MalformedPath { .. } => resolver::malformed_path(path, e),
                CodecError::Model(e) => RestconfError::Model(e),
                other => RestconfError::MalformedDocument {
                    message: other.to_string(),
                },
            })
    }

    fn store_call<T>(
        &self,
        operation: &'static str,
        id: &ResourceId,
        call: impl FnOnce() -> std::result::Result<T, StoreError>,
    ) -> Result<T> {
        call().map_err(|source| {
            error!(operation, id = %id, error = %source, "Store operation failed");
            debug!(operation, id = ?id, source = ?source, "Store failure detail");
            RestconfError::StoreFailure { operation, source }
        })
    }
}

/// Pick the node a write applies and the identifier it applies at.
///
/// Only the first node is used. Nodes parsed at the document root arrive
/// without an identifier; they are applied at the tree root with the root
/// wrapper removed.
fn normalize(data: ResourceData, path: &UriPath) -> Result<(ResourceId, DataNode)> {
    let (id, nodes) = data.into_parts();
    let count = nodes.len();
    let node = nodes
        .into_iter()
        .next()
        .ok_or_else(|| RestconfError::MalformedDocument {
            message: "document holds no nodes".to_string(),
        })?;
    if count > 1 {
        warn!(path = %path, count, "Document holds more than one node, applying the first");
    }

    Ok(match id {
        Some(id) => (id, node),
        None => (ResourceId::root(), strip_root(node)),
    })
}

/// Replace a root wrapper holding exactly one child with that child.
fn strip_root(node: DataNode) -> DataNode {
    match node {
        DataNode::Inner(inner) if inner.key().schema_id().is_root() => {
            match inner.into_single_child() {
                Ok(child) => child,
                Err(wrapper) => wrapper.into(),
            }
        }
        other => other,
    }
}

/// Re-root parsed data one level higher.
///
/// The node named by the last key of the data's identifier is synthesized
/// around the data's nodes: a list entry carrying its key leaves (in the
/// list's namespace) for a list key, a container otherwise. The result is
/// identified by the parent of that node.
pub fn parent_rooted(data: ResourceData) -> Result<ResourceData> {
    let (id, nodes) = data.into_parts();
    let empty = ModelError::EmptyIdentifier {
        operation: "synthesize a parent subtree",
    };
    let id = id.filter(|id| !id.is_root()).ok_or(empty.clone())?;
    let last = id.last_key().ok_or(empty)?;

    let mut parent = match last {
        NodeKey::List(list_key) => {
            let mut entry = InnerNode::new(last.clone(), DataNodeType::MultiInstanceNode);
            for key_leaf in list_key.key_leaves() {
                let schema = match list_key.schema().namespace() {
                    Some(namespace) => SchemaId::new(key_leaf.schema().name(), namespace),
                    None => key_leaf.schema().clone(),
                };
                entry.add_child(DataNode::leaf(schema, key_leaf.value().clone()));
            }
            entry
        }
        other => InnerNode::new(
            NodeKey::Plain(other.schema_id().clone()),
            DataNodeType::SingleInstanceNode,
        ),
    };
    for node in nodes {
        parent.add_child(node);
    }

    let grandparent = id.copy_builder().remove_last_key()?.build();
    Ok(ResourceData::new(Some(grandparent), vec![parent.into()]))
}
