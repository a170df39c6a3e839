//! Schema-qualified node keys.

use std::fmt;

use crate::value::LeafValue;

/// Schema name of the synthetic node at the top of the configuration tree.
pub const ROOT_SCHEMA_NAME: &str = "/";

/// Identifies a schema node: its name and the namespace of its module.
///
/// Only the root marker has no namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId {
    name: String,
    namespace: Option<String>,
}

impl SchemaId {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// The root marker.
    pub fn root() -> Self {
        Self {
            name: ROOT_SCHEMA_NAME.to_string(),
            namespace: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check if this is the root marker.
    pub fn is_root(&self) -> bool {
        self.name == ROOT_SCHEMA_NAME
    }
}

/// One key leaf of a list entry: the leaf's schema and its value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyLeaf {
    schema: SchemaId,
    value: LeafValue,
}

impl KeyLeaf {
    pub fn new(schema: SchemaId, value: impl Into<LeafValue>) -> Self {
        Self {
            schema,
            value: value.into(),
        }
    }

    pub fn schema(&self) -> &SchemaId {
        &self.schema
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }
}

/// Key of a single list entry: the list's schema plus its key leaves.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListKey {
    schema: SchemaId,
    key_leaves: Vec<KeyLeaf>,
}

impl ListKey {
    pub fn new(schema: SchemaId, key_leaves: Vec<KeyLeaf>) -> Self {
        Self { schema, key_leaves }
    }

    pub fn schema(&self) -> &SchemaId {
        &self.schema
    }

    pub fn key_leaves(&self) -> &[KeyLeaf] {
        &self.key_leaves
    }

    pub(crate) fn push(&mut self, key_leaf: KeyLeaf) {
        self.key_leaves.push(key_leaf);
    }
}

/// One step of a resource identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKey {
    /// A single-instance node (container, leaf, RPC, or the root marker).
    Plain(SchemaId),
    /// One entry of a list.
    List(ListKey),
    /// One entry of a leaf-list, identified by its value.
    LeafList { schema: SchemaId, value: LeafValue },
}

impl NodeKey {
    pub fn plain(schema: SchemaId) -> Self {
        NodeKey::Plain(schema)
    }

    pub fn schema_id(&self) -> &SchemaId {
        match self {
            NodeKey::Plain(schema) => schema,
            NodeKey::List(key) => key.schema(),
            NodeKey::LeafList { schema, .. } => schema,
        }
    }

    pub fn as_list_key(&self) -> Option<&ListKey> {
        match self {
            NodeKey::List(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_list_key(&self) -> bool {
        matches!(self, NodeKey::List(_))
    }
}

impl From<SchemaId> for NodeKey {
    fn from(schema: SchemaId) -> Self {
        NodeKey::Plain(schema)
    }
}

impl From<ListKey> for NodeKey {
    fn from(key: ListKey) -> Self {
        NodeKey::List(key)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Plain(schema) => write!(f, "{}", schema.name()),
            NodeKey::List(key) => {
                write!(f, "{}[", key.schema().name())?;
                for (i, leaf) in key.key_leaves().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}={}", leaf.schema().name(), leaf.value())?;
                }
                write!(f, "]")
            }
            NodeKey::LeafList { schema, value } => write!(f, "{}[.={}]", schema.name(), value),
        }
    }
}
