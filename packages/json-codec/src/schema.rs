//! A minimal YANG-like schema model.
//!
//! The codec needs only enough schema to qualify names with namespaces, to
//! know which nodes are lists and what their keys are, and to type leaf
//! values. Schemas can be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "modules": [{
//!     "name": "net",
//!     "namespace": "urn:example:net",
//!     "nodes": [
//!       {"name": "devices", "kind": "container", "children": [
//!         {"name": "device", "kind": "list", "keys": ["id"], "children": [
//!           {"name": "id", "kind": "leaf", "type": "uint"}
//!         ]}
//!       ]}
//!     ]
//!   }]
//! }
//! ```

use restconf_core::CodecError;
use serde::{Deserialize, Serialize};

/// Type of a leaf or leaf-list value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafType {
    String,
    Boolean,
    Int,
    Uint,
    Decimal,
    Empty,
}

/// What kind of schema node this is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SchemaNodeKind {
    Container,
    List {
        keys: Vec<String>,
    },
    Leaf {
        #[serde(rename = "type")]
        leaf_type: LeafType,
    },
    LeafList {
        #[serde(rename = "type")]
        leaf_type: LeafType,
    },
    /// A remote procedure. Its children are the `input` and `output`
    /// containers.
    Rpc,
}

/// One node of the schema tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub name: String,

    #[serde(flatten)]
    pub kind: SchemaNodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaNode>,

    /// Filled in from the owning module.
    #[serde(skip)]
    namespace: String,
}

impl SchemaNode {
    fn new(name: impl Into<String>, kind: SchemaNodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            namespace: String::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, SchemaNodeKind::Container)
    }

    pub fn list<K: Into<String>>(name: impl Into<String>, keys: impl IntoIterator<Item = K>) -> Self {
        Self::new(
            name,
            SchemaNodeKind::List {
                keys: keys.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn leaf(name: impl Into<String>, leaf_type: LeafType) -> Self {
        Self::new(name, SchemaNodeKind::Leaf { leaf_type })
    }

    pub fn leaf_list(name: impl Into<String>, leaf_type: LeafType) -> Self {
        Self::new(name, SchemaNodeKind::LeafList { leaf_type })
    }

    pub fn rpc(name: impl Into<String>) -> Self {
        Self::new(name, SchemaNodeKind::Rpc)
    }

    #[must_use]
    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Leaf type of a leaf or leaf-list.
    pub fn leaf_type(&self) -> Option<LeafType> {
        match self.kind {
            SchemaNodeKind::Leaf { leaf_type } | SchemaNodeKind::LeafList { leaf_type } => {
                Some(leaf_type)
            }
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf_type().is_some()
    }

    /// Key leaf names of a list.
    pub fn list_keys(&self) -> Option<&[String]> {
        match &self.kind {
            SchemaNodeKind::List { keys } => Some(keys),
            _ => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|child| child.name == name)
    }

    fn assign_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_string();
        for child in &mut self.children {
            child.assign_namespace(namespace);
        }
    }
}

/// A YANG module: a namespace and its top-level nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub nodes: Vec<SchemaNode>,
}

impl Module {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_node(mut self, node: SchemaNode) -> Self {
        self.nodes.push(node);
        self
    }
}

#[derive(Deserialize)]
struct SchemaFile {
    modules: Vec<Module>,
}

/// The set of modules a codec resolves paths and documents against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaContext {
    modules: Vec<Module>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, propagating its namespace to every node.
    #[must_use]
    pub fn with_module(mut self, mut module: Module) -> Self {
        let namespace = module.namespace.clone();
        for node in &mut module.nodes {
            node.assign_namespace(&namespace);
        }
        self.modules.push(module);
        self
    }

    /// Load a schema from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let file: SchemaFile =
            serde_json::from_str(json).map_err(|e| CodecError::InvalidDocument {
                message: format!("invalid schema: {}", e),
            })?;
        Ok(file
            .modules
            .into_iter()
            .fold(Self::new(), |context, module| context.with_module(module)))
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name == name)
    }

    pub fn module_for_namespace(&self, namespace: &str) -> Option<&Module> {
        self.modules
            .iter()
            .find(|module| module.namespace == namespace)
    }

    /// Find a node named `name` among the children of `parent`, or among the
    /// top-level nodes of every module when `parent` is `None`.
    ///
    /// A `module` prefix restricts the match to that module's namespace. An
    /// unprefixed name matching nodes of several modules finds nothing.
    pub fn lookup<'a>(
        &'a self,
        parent: Option<&'a SchemaNode>,
        module: Option<&str>,
        name: &str,
    ) -> Option<&'a SchemaNode> {
        match self.candidates(parent, module, name)?.as_slice() {
            [node] => Some(*node),
            _ => None,
        }
    }

    /// Check if an unprefixed `name` matches nodes of more than one module.
    pub fn is_ambiguous(&self, parent: Option<&SchemaNode>, name: &str) -> bool {
        self.candidates(parent, None, name)
            .is_some_and(|nodes| nodes.len() > 1)
    }

    fn candidates<'a>(
        &'a self,
        parent: Option<&'a SchemaNode>,
        module: Option<&str>,
        name: &str,
    ) -> Option<Vec<&'a SchemaNode>> {
        let namespace = match module {
            Some(module) => Some(self.module(module)?.namespace.as_str()),
            None => None,
        };
        let matches = |node: &&SchemaNode| {
            node.name == name && namespace.is_none_or(|ns| node.namespace == ns)
        };

        Some(match parent {
            Some(parent) => parent.children.iter().filter(matches).collect(),
            None => self
                .modules
                .iter()
                .flat_map(|module| module.nodes.iter())
                .filter(matches)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "modules": [{
            "name": "net",
            "namespace": "urn:example:net",
            "nodes": [
                {"name": "devices", "kind": "container", "children": [
                    {"name": "device", "kind": "list", "keys": ["id"], "children": [
                        {"name": "id", "kind": "leaf", "type": "uint"},
                        {"name": "tags", "kind": "leaf-list", "type": "string"}
                    ]}
                ]},
                {"name": "reboot", "kind": "rpc"}
            ]
        }, {
            "name": "sys",
            "namespace": "urn:example:sys",
            "nodes": [{"name": "devices", "kind": "container"}]
        }]
    }"#;

    #[test]
    fn load_from_json() {
        let context = SchemaContext::from_json(SCHEMA).unwrap();
        assert_eq!(context.modules().len(), 2);

        let devices = context.lookup(None, Some("net"), "devices").unwrap();
        assert_eq!(devices.namespace(), "urn:example:net");

        let device = context.lookup(Some(devices), None, "device").unwrap();
        assert_eq!(device.list_keys(), Some(&["id".to_string()][..]));
        assert_eq!(device.namespace(), "urn:example:net");

        let tags = device.child("tags").unwrap();
        assert_eq!(tags.leaf_type(), Some(LeafType::String));
        assert!(tags.is_leaf());
    }

    #[test]
    fn module_prefix_selects_namespace() {
        let context = SchemaContext::from_json(SCHEMA).unwrap();
        let sys = context.lookup(None, Some("sys"), "devices").unwrap();
        assert_eq!(sys.namespace(), "urn:example:sys");

        assert!(context.lookup(None, Some("missing"), "devices").is_none());
        assert!(context.lookup(None, None, "nothing").is_none());
    }

    #[test]
    fn unprefixed_name_in_several_modules_is_ambiguous() {
        let context = SchemaContext::from_json(SCHEMA).unwrap();
        assert!(context.lookup(None, None, "devices").is_none());
        assert!(context.is_ambiguous(None, "devices"));

        assert!(context.lookup(None, None, "reboot").is_some());
        assert!(!context.is_ambiguous(None, "reboot"));
        assert!(!context.is_ambiguous(None, "nothing"));
    }

    #[test]
    fn invalid_schema_rejected() {
        let err = SchemaContext::from_json(r#"{"modules": [{"name": "x"}]}"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDocument { .. }));
    }

    #[test]
    fn builder_assigns_namespaces() {
        let context = SchemaContext::new().with_module(
            Module::new("net", "urn:example:net").with_node(
                SchemaNode::container("system")
                    .with_child(SchemaNode::leaf("hostname", LeafType::String)),
            ),
        );
        let system = context.lookup(None, None, "system").unwrap();
        assert_eq!(system.child("hostname").unwrap().namespace(), "urn:example:net");
        assert_eq!(
            context.module_for_namespace("urn:example:net").unwrap().name,
            "net"
        );
    }
}
