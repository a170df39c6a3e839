//! The DataNode type - the typed configuration tree.
//!
//! A tree node is either an inner node owning keyed children (containers,
//! list entries, the root marker) or a leaf node owning a typed value.

use std::collections::BTreeMap;

use crate::node_key::{ListKey, NodeKey, SchemaId};
use crate::value::LeafValue;

/// The schema role a node plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataNodeType {
    /// Container or other single-instance inner node.
    SingleInstanceNode,
    /// One entry of a list.
    MultiInstanceNode,
    /// A leaf.
    SingleInstanceLeafValueNode,
    /// One entry of a leaf-list.
    MultiInstanceLeafValueNode,
}

impl DataNodeType {
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            DataNodeType::SingleInstanceLeafValueNode | DataNodeType::MultiInstanceLeafValueNode
        )
    }
}

/// A node in the configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub enum DataNode {
    Inner(InnerNode),
    Leaf(LeafNode),
}

impl DataNode {
    /// An empty container.
    pub fn container(schema: SchemaId) -> Self {
        DataNode::Inner(InnerNode::new(
            NodeKey::Plain(schema),
            DataNodeType::SingleInstanceNode,
        ))
    }

    /// An empty list entry. Key leaf children are not added automatically.
    pub fn list_entry(key: ListKey) -> Self {
        DataNode::Inner(InnerNode::new(
            NodeKey::List(key),
            DataNodeType::MultiInstanceNode,
        ))
    }

    /// A leaf with a value.
    pub fn leaf(schema: SchemaId, value: impl Into<LeafValue>) -> Self {
        DataNode::Leaf(LeafNode::new(
            NodeKey::Plain(schema),
            DataNodeType::SingleInstanceLeafValueNode,
            value,
        ))
    }

    /// One entry of a leaf-list.
    pub fn leaf_list_entry(schema: SchemaId, value: impl Into<LeafValue>) -> Self {
        let value = value.into();
        DataNode::Leaf(LeafNode::new(
            NodeKey::LeafList {
                schema,
                value: value.clone(),
            },
            DataNodeType::MultiInstanceLeafValueNode,
            value,
        ))
    }

    pub fn key(&self) -> &NodeKey {
        match self {
            DataNode::Inner(inner) => inner.key(),
            DataNode::Leaf(leaf) => leaf.key(),
        }
    }

    pub fn schema_id(&self) -> &SchemaId {
        self.key().schema_id()
    }

    pub fn node_type(&self) -> DataNodeType {
        match self {
            DataNode::Inner(inner) => inner.node_type(),
            DataNode::Leaf(leaf) => leaf.node_type(),
        }
    }

    pub fn as_inner(&self) -> Option<&InnerNode> {
        match self {
            DataNode::Inner(inner) => Some(inner),
            DataNode::Leaf(_) => None,
        }
    }

    pub fn as_inner_mut(&mut self) -> Option<&mut InnerNode> {
        match self {
            DataNode::Inner(inner) => Some(inner),
            DataNode::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            DataNode::Leaf(leaf) => Some(leaf),
            DataNode::Inner(_) => None,
        }
    }

    pub fn is_inner(&self) -> bool {
        matches!(self, DataNode::Inner(_))
    }

    /// Builder-style child insertion. No-op on leaves.
    #[must_use]
    pub fn with_child(mut self, child: DataNode) -> Self {
        if let DataNode::Inner(inner) = &mut self {
            inner.add_child(child);
        }
        self
    }
}

impl From<InnerNode> for DataNode {
    fn from(node: InnerNode) -> Self {
        DataNode::Inner(node)
    }
}

impl From<LeafNode> for DataNode {
    fn from(node: LeafNode) -> Self {
        DataNode::Leaf(node)
    }
}

/// A node that owns child nodes keyed by their node key.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerNode {
    key: NodeKey,
    node_type: DataNodeType,
    children: BTreeMap<NodeKey, DataNode>,
}

impl InnerNode {
    pub fn new(key: NodeKey, node_type: DataNodeType) -> Self {
        Self {
            key,
            node_type,
            children: BTreeMap::new(),
        }
    }

    /// The synthetic node at the top of the tree.
    pub fn root() -> Self {
        Self::new(
            NodeKey::Plain(SchemaId::root()),
            DataNodeType::SingleInstanceNode,
        )
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn node_type(&self) -> DataNodeType {
        self.node_type
    }

    pub fn children(&self) -> &BTreeMap<NodeKey, DataNode> {
        &self.children
    }

    pub fn child(&self, key: &NodeKey) -> Option<&DataNode> {
        self.children.get(key)
    }

    pub fn child_mut(&mut self, key: &NodeKey) -> Option<&mut DataNode> {
        self.children.get_mut(key)
    }

    /// Find the first child whose schema name is `name`.
    pub fn child_by_name(&self, name: &str) -> Option<&DataNode> {
        self.children
            .values()
            .find(|child| child.schema_id().name() == name)
    }

    /// Insert a child, replacing any child with the same key.
    ///
    /// Returns the replaced child.
    pub fn add_child(&mut self, child: DataNode) -> Option<DataNode> {
        self.children.insert(child.key().clone(), child)
    }

    pub fn remove_child(&mut self, key: &NodeKey) -> Option<DataNode> {
        self.children.remove(key)
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn into_children(self) -> BTreeMap<NodeKey, DataNode> {
        self.children
    }

    /// Unwrap a node holding exactly one child.
    ///
    /// Returns the node unchanged when it holds zero or several children.
    pub fn into_single_child(mut self) -> Result<DataNode, InnerNode> {
        if self.children.len() != 1 {
            return Err(self);
        }
        match self.children.pop_first() {
            Some((_, child)) => Ok(child),
            None => Err(self),
        }
    }
}

/// A node holding a typed value.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafNode {
    key: NodeKey,
    node_type: DataNodeType,
    value: LeafValue,
}

impl LeafNode {
    pub fn new(key: NodeKey, node_type: DataNodeType, value: impl Into<LeafValue>) -> Self {
        Self {
            key,
            node_type,
            value: value.into(),
        }
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn node_type(&self) -> DataNodeType {
        self.node_type
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}
