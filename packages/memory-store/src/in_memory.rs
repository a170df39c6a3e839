//! In-memory configuration store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use restconf_core::{
    ConfigStore, DataNode, Filter, InnerNode, NodeKey, ResourceId, RpcInput, RpcOutput,
    StoreError,
};
use tracing::debug;

use crate::rpc_handler::RpcHandler;
use crate::tree_utils;

/// A configuration store holding the whole tree in memory.
///
/// Identifiers are matched on their keys below the root marker, so an
/// identifier with or without the leading root key addresses the same node.
///
/// # Example
///
/// ```rust
/// use restconf_core::{ConfigStore, DataNode, Filter, ResourceId, SchemaId};
/// use restconf_memory_store::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let system = DataNode::container(SchemaId::new("system", "urn:example:sys"));
///
/// store.create(&ResourceId::root(), system.clone()).unwrap();
///
/// let id = ResourceId::root().child(system.key().clone());
/// assert!(store.exists(&id).unwrap());
/// assert_eq!(store.read(&id, &Filter::new()).unwrap(), system);
/// ```
pub struct InMemoryConfigStore {
    root: RwLock<DataNode>,
    rpcs: RwLock<BTreeMap<Vec<NodeKey>, Arc<dyn RpcHandler>>>,
}

impl InMemoryConfigStore {
    /// Create a store holding only the root node.
    pub fn new() -> Self {
        Self::with_data(InnerNode::root())
    }

    /// Create a store with initial data.
    pub fn with_data(root: InnerNode) -> Self {
        Self {
            root: RwLock::new(root.into()),
            rpcs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register the procedure invoked for `id`, replacing any previous one.
    pub fn register_rpc(
        &self,
        id: &ResourceId,
        handler: impl RpcHandler + 'static,
    ) -> Result<(), StoreError> {
        let mut rpcs = self
            .rpcs
            .write()
            .map_err(|_| StoreError::failed("rpc registry lock poisoned"))?;
        rpcs.insert(id.relative_keys().to_vec(), Arc::new(handler));
        Ok(())
    }

    /// A copy of the whole tree.
    pub fn snapshot(&self) -> Result<DataNode, StoreError> {
        Ok(self.read_root()?.clone())
    }

    fn read_root(&self) -> Result<RwLockReadGuard<'_, DataNode>, StoreError> {
        self.root
            .read()
            .map_err(|_| StoreError::failed("store lock poisoned"))
    }

    fn write_root(&self) -> Result<RwLockWriteGuard<'_, DataNode>, StoreError> {
        self.root
            .write()
            .map_err(|_| StoreError::failed("store lock poisoned"))
    }

    /// Run `apply` on the inner node at `parent`.
    fn with_parent<T>(
        &self,
        parent: &ResourceId,
        apply: impl FnOnce(&mut InnerNode) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut root = self.write_root()?;
        let node = tree_utils::get_node_mut(&mut root, parent.relative_keys())
            .and_then(DataNode::as_inner_mut)
            .ok_or_else(|| StoreError::InvalidParent { id: parent.clone() })?;
        apply(node)
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    fn exists(&self, id: &ResourceId) -> Result<bool, StoreError> {
        let root = self.read_root()?;
        Ok(tree_utils::get_node(&root, id.relative_keys()).is_some())
    }

    fn read(&self, id: &ResourceId, filter: &Filter) -> Result<DataNode, StoreError> {
        if !filter.is_empty() {
            return Err(StoreError::failed("read filter criteria are not supported"));
        }
        let root = self.read_root()?;
        tree_utils::get_node(&root, id.relative_keys())
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    fn create(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        debug!(parent = %parent, node = %node.key(), "Creating node");
        self.with_parent(parent, |inner| {
            let nodes = unwrap_root(node);
            if let Some(existing) = nodes.iter().find(|node| inner.child(node.key()).is_some()) {
                return Err(StoreError::AlreadyExists {
                    id: parent.child(existing.key().clone()),
                });
            }
            for node in nodes {
                inner.add_child(node);
            }
            Ok(())
        })
    }

    fn replace(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        debug!(parent = %parent, node = %node.key(), "Replacing node");
        self.with_parent(parent, |inner| {
            for node in unwrap_root(node) {
                inner.add_child(node);
            }
            Ok(())
        })
    }

    fn update(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        debug!(parent = %parent, node = %node.key(), "Merging node");
        self.with_parent(parent, |inner| {
            for node in unwrap_root(node) {
                tree_utils::merge(inner, node);
            }
            Ok(())
        })
    }

    fn delete(&self, id: &ResourceId) -> Result<(), StoreError> {
        debug!(id = %id, "Deleting node");
        let Some((last, parent_keys)) = id.relative_keys().split_last() else {
            let mut root = self.write_root()?;
            if let Some(inner) = root.as_inner_mut() {
                inner.clear_children();
            }
            return Ok(());
        };

        let mut root = self.write_root()?;
        tree_utils::get_node_mut(&mut root, parent_keys)
            .and_then(DataNode::as_inner_mut)
            .and_then(|parent| parent.remove_child(last))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    async fn invoke_rpc(&self, id: &ResourceId, input: RpcInput) -> Result<RpcOutput, StoreError> {
        let handler = {
            let rpcs = self
                .rpcs
                .read()
                .map_err(|_| StoreError::failed("rpc registry lock poisoned"))?;
            rpcs.get(id.relative_keys())
                .cloned()
                .ok_or_else(|| StoreError::RpcNotFound { id: id.clone() })?
        };
        debug!(id = %id, "Invoking RPC");
        handler.call(input).await
    }
}

/// A root marker node carries top-level nodes; writes apply them one by one.
fn unwrap_root(node: DataNode) -> Vec<DataNode> {
    match node {
        DataNode::Inner(wrapper) if wrapper.key().schema_id().is_root() => {
            wrapper.into_children().into_values().collect()
        }
        node => vec![node],
    }
}
