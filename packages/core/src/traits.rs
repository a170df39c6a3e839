//! Collaborator traits: ConfigStore and DocumentCodec.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    CodecError, DataNode, ResourceData, ResourceId, RestconfRpcOutput, RpcInput, RpcOutput,
    StoreError, UriPath,
};

/// The wire document exchanged with RESTCONF clients.
pub type Document = serde_json::Value;

/// Read filter passed to [`ConfigStore::read`].
///
/// Nothing populates it yet; stores must treat an empty filter as "the whole
/// subtree" and reject criteria they cannot apply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    criteria: Vec<ResourceId>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the read to the given descendant.
    #[must_use]
    pub fn with_criteria(mut self, id: ResourceId) -> Self {
        self.criteria.push(id);
        self
    }

    pub fn criteria(&self) -> &[ResourceId] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

/// The configuration store the manager translates requests into.
///
/// Writes take the identifier of the *parent* node (create, replace, update)
/// and the node to apply beneath it. Stores own any locking or transactional
/// isolation; every method may be called concurrently.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn ConfigStore>`.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Check whether a node exists.
    fn exists(&self, id: &ResourceId) -> Result<bool, StoreError>;

    /// Read the subtree rooted at `id`.
    fn read(&self, id: &ResourceId, filter: &Filter) -> Result<DataNode, StoreError>;

    /// Create `node` under `parent`. Fails if the node already exists.
    fn create(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError>;

    /// Replace (or create) `node` under `parent`.
    fn replace(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError>;

    /// Merge `node` into the tree under `parent`.
    fn update(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError>;

    /// Delete the node at `id`.
    fn delete(&self, id: &ResourceId) -> Result<(), StoreError>;

    /// Execute the remote procedure at `id`.
    async fn invoke_rpc(&self, id: &ResourceId, input: RpcInput) -> Result<RpcOutput, StoreError>;
}

/// Conversion between JSON documents and tree nodes, keyed by a schema.
pub trait DocumentCodec: Send + Sync {
    /// Resolve a request path against the schema.
    fn path_to_resource_id(&self, path: &UriPath) -> Result<ResourceId, CodecError>;

    /// Decode a document addressed to `path`.
    ///
    /// The returned identifier is the one of `path`; it is absent when `path`
    /// is the root, in which case the nodes are wrapped in a root marker node.
    fn document_to_resource_data(
        &self,
        path: &UriPath,
        document: &Document,
    ) -> Result<ResourceData, CodecError>;

    /// Encode the node found at `id`.
    fn resource_data_to_document(
        &self,
        id: &ResourceId,
        node: &DataNode,
    ) -> Result<Document, CodecError>;

    /// Wrap a store RPC result in the protocol envelope.
    fn rpc_output_to_envelope(
        &self,
        id: &ResourceId,
        output: RpcOutput,
    ) -> Result<RestconfRpcOutput, CodecError>;
}

// Blanket implementations for shared and boxed collaborators

#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn exists(&self, id: &ResourceId) -> Result<bool, StoreError> {
        self.as_ref().exists(id)
    }

    fn read(&self, id: &ResourceId, filter: &Filter) -> Result<DataNode, StoreError> {
        self.as_ref().read(id, filter)
    }

    fn create(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        self.as_ref().create(parent, node)
    }

    fn replace(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        self.as_ref().replace(parent, node)
    }

    fn update(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        self.as_ref().update(parent, node)
    }

    fn delete(&self, id: &ResourceId) -> Result<(), StoreError> {
        self.as_ref().delete(id)
    }

    async fn invoke_rpc(&self, id: &ResourceId, input: RpcInput) -> Result<RpcOutput, StoreError> {
        self.as_ref().invoke_rpc(id, input).await
    }
}

impl<T: DocumentCodec + ?Sized> DocumentCodec for Arc<T> {
    fn path_to_resource_id(&self, path: &UriPath) -> Result<ResourceId, CodecError> {
        self.as_ref().path_to_resource_id(path)
    }

    fn document_to_resource_data(
        &self,
        path: &UriPath,
        document: &Document,
    ) -> Result<ResourceData, CodecError> {
        self.as_ref().document_to_resource_data(path, document)
    }

    fn resource_data_to_document(
        &self,
        id: &ResourceId,
        node: &DataNode,
    ) -> Result<Document, CodecError> {
        self.as_ref().resource_data_to_document(id, node)
    }

    fn rpc_output_to_envelope(
        &self,
        id: &ResourceId,
        output: RpcOutput,
    ) -> Result<RestconfRpcOutput, CodecError> {
        self.as_ref().rpc_output_to_envelope(id, output)
    }
}
