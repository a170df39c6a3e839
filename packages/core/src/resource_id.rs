//! Resource identifiers: the path from the tree root to a node.

use std::fmt;

use crate::error::ModelError;
use crate::node_key::{KeyLeaf, ListKey, NodeKey, SchemaId};
use crate::value::LeafValue;

/// An ordered sequence of node keys locating a node in the configuration tree.
///
/// Identifiers produced by path resolution start with the root marker key.
/// They are built with [`ResourceIdBuilder`] and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceId {
    node_keys: Vec<NodeKey>,
}

impl ResourceId {
    pub fn builder() -> ResourceIdBuilder {
        ResourceIdBuilder::default()
    }

    /// The identifier of the tree root: just the root marker.
    pub fn root() -> Self {
        Self {
            node_keys: vec![NodeKey::Plain(SchemaId::root())],
        }
    }

    pub fn node_keys(&self) -> &[NodeKey] {
        &self.node_keys
    }

    /// Node keys below the root marker.
    pub fn relative_keys(&self) -> &[NodeKey] {
        match self.node_keys.first() {
            Some(first) if first.schema_id().is_root() => &self.node_keys[1..],
            _ => &self.node_keys,
        }
    }

    pub fn last_key(&self) -> Option<&NodeKey> {
        self.node_keys.last()
    }

    pub fn len(&self) -> usize {
        self.node_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_keys.is_empty()
    }

    /// Check if this identifier addresses the tree root.
    pub fn is_root(&self) -> bool {
        self.relative_keys().is_empty()
    }

    /// The identifier with its last key removed.
    ///
    /// Returns `None` for an empty identifier.
    pub fn parent(&self) -> Option<ResourceId> {
        let (_, rest) = self.node_keys.split_last()?;
        Some(ResourceId {
            node_keys: rest.to_vec(),
        })
    }

    /// Extend this identifier by one key.
    #[must_use]
    pub fn child(&self, key: NodeKey) -> ResourceId {
        let mut node_keys = self.node_keys.clone();
        node_keys.push(key);
        ResourceId { node_keys }
    }

    /// A builder seeded with this identifier's keys.
    pub fn copy_builder(&self) -> ResourceIdBuilder {
        ResourceIdBuilder {
            node_keys: self.node_keys.clone(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.relative_keys();
        if keys.is_empty() {
            return write!(f, "/");
        }
        for key in keys {
            write!(f, "/{}", key)?;
        }
        Ok(())
    }
}

/// Builder for [`ResourceId`].
#[derive(Clone, Debug, Default)]
pub struct ResourceIdBuilder {
    node_keys: Vec<NodeKey>,
}

impl ResourceIdBuilder {
    /// Append a plain key for a schema node.
    #[must_use]
    pub fn add_schema(mut self, schema: SchemaId) -> Self {
        self.node_keys.push(NodeKey::Plain(schema));
        self
    }

    /// Append a plain key for the node `name` in `namespace`.
    #[must_use]
    pub fn add_branch_point_schema(
        self,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.add_schema(SchemaId::new(name, namespace))
    }

    /// Append an already-built key.
    #[must_use]
    pub fn add_node_key(mut self, key: NodeKey) -> Self {
        self.node_keys.push(key);
        self
    }

    /// Add a key leaf to the last key, turning it into a list key.
    pub fn add_key_leaf(
        mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        value: impl Into<LeafValue>,
    ) -> Result<Self, ModelError> {
        let key_leaf = KeyLeaf::new(SchemaId::new(name, namespace), value);
        let last = self
            .node_keys
            .pop()
            .ok_or(ModelError::EmptyIdentifier {
                operation: "add a key leaf",
            })?;
        let list_key = match last {
            NodeKey::Plain(schema) => ListKey::new(schema, vec![key_leaf]),
            NodeKey::List(mut list_key) => {
                list_key.push(key_leaf);
                list_key
            }
            NodeKey::LeafList { schema, .. } => {
                return Err(ModelError::NotAList {
                    name: schema.name().to_string(),
                })
            }
        };
        self.node_keys.push(NodeKey::List(list_key));
        Ok(self)
    }

    /// Turn the last key into a leaf-list entry key with the given value.
    pub fn add_leaf_list_value(mut self, value: impl Into<LeafValue>) -> Result<Self, ModelError> {
        let last = self
            .node_keys
            .pop()
            .ok_or(ModelError::EmptyIdentifier {
                operation: "add a leaf-list value",
            })?;
        self.node_keys.push(NodeKey::LeafList {
            schema: last.schema_id().clone(),
            value: value.into(),
        });
        Ok(self)
    }

    /// Drop the last key.
    pub fn remove_last_key(mut self) -> Result<Self, ModelError> {
        self.node_keys
            .pop()
            .ok_or(ModelError::EmptyIdentifier {
                operation: "remove the last key",
            })?;
        Ok(self)
    }

    pub fn build(self) -> ResourceId {
        ResourceId {
            node_keys: self.node_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example:net";

    fn port_id() -> ResourceId {
        ResourceId::root()
            .copy_builder()
            .add_branch_point_schema("devices", NS)
            .add_branch_point_schema("device", NS)
            .add_key_leaf("id", NS, 1u64)
            .unwrap()
            .add_branch_point_schema("port", NS)
            .add_key_leaf("id", NS, 2u64)
            .unwrap()
            .build()
    }

    #[test]
    fn display_elides_root_marker() {
        assert_eq!(port_id().to_string(), "/devices/device[id=1]/port[id=2]");
        assert_eq!(ResourceId::root().to_string(), "/");
    }

    #[test]
    fn add_key_leaf_builds_list_key() {
        let id = port_id();
        let last = id.last_key().unwrap().as_list_key().unwrap();
        assert_eq!(last.schema().name(), "port");
        assert_eq!(last.key_leaves().len(), 1);
        assert_eq!(last.key_leaves()[0].value(), &LeafValue::Uint(2));
    }

    #[test]
    fn multiple_key_leaves_accumulate() {
        let id = ResourceId::builder()
            .add_branch_point_schema("route", NS)
            .add_key_leaf("prefix", NS, "10.0.0.0/8")
            .unwrap()
            .add_key_leaf("table", NS, 254u64)
            .unwrap()
            .build();
        let key = id.last_key().unwrap().as_list_key().unwrap();
        assert_eq!(key.key_leaves().len(), 2);
    }

    #[test]
    fn add_key_leaf_on_empty_builder_fails() {
        let result = ResourceId::builder().add_key_leaf("id", NS, 1u64);
        assert!(matches!(result, Err(ModelError::EmptyIdentifier { .. })));
    }

    #[test]
    fn add_key_leaf_after_leaf_list_fails() {
        let result = ResourceId::builder()
            .add_branch_point_schema("dns", NS)
            .add_leaf_list_value("10.0.0.1")
            .unwrap()
            .add_key_leaf("id", NS, 1u64);
        assert!(matches!(result, Err(ModelError::NotAList { .. })));
    }

    #[test]
    fn parent_drops_last_key() {
        let id = port_id();
        let parent = id.parent().unwrap();
        assert_eq!(parent.to_string(), "/devices/device[id=1]");
        assert_eq!(parent.len(), id.len() - 1);
        assert!(ResourceId::builder().build().parent().is_none());
    }

    #[test]
    fn remove_last_key_matches_parent() {
        let id = port_id();
        let removed = id.copy_builder().remove_last_key().unwrap().build();
        assert_eq!(Some(removed), id.parent());
        assert!(ResourceId::builder().remove_last_key().is_err());
    }

    #[test]
    fn root_detection() {
        assert!(ResourceId::root().is_root());
        assert!(!port_id().is_root());
        assert_eq!(port_id().relative_keys().len(), 4);
    }

    #[test]
    fn child_extends() {
        let id = ResourceId::root().child(NodeKey::plain(SchemaId::new("devices", NS)));
        assert_eq!(id.to_string(), "/devices");
    }
}
