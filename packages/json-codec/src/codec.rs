//! JSON document codec keyed by a [`SchemaContext`].

use restconf_core::{
    CodecError, DataNode, DataNodeType, Document, DocumentCodec, InnerNode, KeyLeaf, ListKey,
    ResourceData, ResourceId, RestconfRpcOutput, RpcOutput, SchemaId, UriPath,
};
use serde_json::{Map, Value as JsonValue};

use crate::convert::{leaf_from_json, leaf_from_str, leaf_to_json};
use crate::schema::{SchemaContext, SchemaNode, SchemaNodeKind};

/// A codec between RFC 7951 style JSON documents and tree nodes.
///
/// Member names are `name` or `module:name`; the module prefix is written
/// on top-level members and wherever the namespace changes.
///
/// # Example
///
/// ```rust
/// use restconf_core::{DocumentCodec, UriPath};
/// use restconf_json_codec::{JsonCodec, LeafType, Module, SchemaContext, SchemaNode};
/// use serde_json::json;
///
/// let schema = SchemaContext::new().with_module(
///     Module::new("sys", "urn:example:sys").with_node(
///         SchemaNode::container("system")
///             .with_child(SchemaNode::leaf("hostname", LeafType::String)),
///     ),
/// );
/// let codec = JsonCodec::new(schema);
///
/// let path = UriPath::parse("/system").unwrap();
/// let data = codec
///     .document_to_resource_data(&path, &json!({"hostname": "edge1"}))
///     .unwrap();
/// assert_eq!(data.data_nodes().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    schema: SchemaContext,
}

impl JsonCodec {
    pub fn new(schema: SchemaContext) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaContext {
        &self.schema
    }

    /// Resolve a path to its identifier and the schema node it ends at.
    fn resolve(&self, path: &UriPath) -> Result<(ResourceId, Option<&SchemaNode>), CodecError> {
        let malformed = |message: String| CodecError::MalformedPath {
            path: path.to_string(),
            message,
        };

        let mut builder = ResourceId::root().copy_builder();
        let mut current: Option<&SchemaNode> = None;

        for segment in path.segments() {
            let node = self
                .schema
                .lookup(current, segment.module(), segment.name())
                .ok_or_else(|| {
                    if segment.module().is_none()
                        && self.schema.is_ambiguous(current, segment.name())
                    {
                        malformed(format!(
                            "node '{}' is defined by several modules; qualify it as module:{}",
                            segment.name(),
                            segment.name()
                        ))
                    } else {
                        malformed(format!("unknown node '{}'", segment.name()))
                    }
                })?;

            builder = builder.add_branch_point_schema(node.name.as_str(), node.namespace());
            builder = match (&node.kind, segment.keys()) {
                (SchemaNodeKind::List { keys }, Some(values)) => {
                    if keys.len() != values.len() {
                        return Err(malformed(format!(
                            "list '{}' expects {} key value(s), got {}",
                            node.name,
                            keys.len(),
                            values.len()
                        )));
                    }
                    for (key, raw) in keys.iter().zip(values) {
                        let leaf_type = node
                            .child(key)
                            .and_then(SchemaNode::leaf_type)
                            .ok_or_else(|| {
                                malformed(format!("list '{}' has no key leaf '{}'", node.name, key))
                            })?;
                        let value = leaf_from_str(leaf_type, raw).map_err(&malformed)?;
                        builder = builder.add_key_leaf(key.as_str(), node.namespace(), value)?;
                    }
                    builder
                }
                (SchemaNodeKind::List { .. }, None) => {
                    return Err(malformed(format!(
                        "list '{}' requires key values",
                        node.name
                    )));
                }
                (SchemaNodeKind::LeafList { leaf_type }, Some([raw])) => {
                    let value = leaf_from_str(*leaf_type, raw).map_err(&malformed)?;
                    builder.add_leaf_list_value(value)?
                }
                (SchemaNodeKind::LeafList { .. }, Some(_)) => {
                    return Err(malformed(format!(
                        "leaf-list '{}' takes exactly one value",
                        node.name
                    )));
                }
                (_, Some(_)) => {
                    return Err(malformed(format!(
                        "node '{}' does not take key values",
                        node.name
                    )));
                }
                (_, None) => builder,
            };
            current = Some(node);
        }

        Ok((builder.build(), current))
    }

    /// Decode the members of a JSON object into nodes under `parent`.
    fn decode_members(
        &self,
        parent: Option<&SchemaNode>,
        object: &Map<String, JsonValue>,
    ) -> Result<Vec<DataNode>, CodecError> {
        let mut nodes = Vec::new();
        for (member, value) in object {
            let (module, name) = split_member(member);
            let schema = self.schema.lookup(parent, module, name).ok_or_else(|| {
                CodecError::UnknownNode {
                    name: member.clone(),
                    parent: parent.map_or_else(|| "/".to_string(), |p| p.name.clone()),
                }
            })?;
            nodes.extend(self.decode_node(schema, value)?);
        }
        Ok(nodes)
    }

    fn decode_node(&self, schema: &SchemaNode, value: &JsonValue) -> Result<Vec<DataNode>, CodecError> {
        let schema_id = SchemaId::new(schema.name.as_str(), schema.namespace());
        match &schema.kind {
            SchemaNodeKind::Container | SchemaNodeKind::Rpc => {
                let object = expect_object(&schema.name, value)?;
                let mut inner =
                    InnerNode::new(schema_id.into(), DataNodeType::SingleInstanceNode);
                for child in self.decode_members(Some(schema), object)? {
                    inner.add_child(child);
                }
                Ok(vec![inner.into()])
            }
            SchemaNodeKind::List { keys } => {
                let entries: Vec<&JsonValue> = match value {
                    JsonValue::Array(entries) => entries.iter().collect(),
                    single => vec![single],
                };
                entries
                    .into_iter()
                    .map(|entry| self.decode_list_entry(schema, keys, entry))
                    .collect()
            }
            SchemaNodeKind::Leaf { leaf_type } => {
                let value = leaf_from_json(*leaf_type, value).map_err(|message| {
                    CodecError::InvalidValue {
                        leaf: schema.name.clone(),
                        message,
                    }
                })?;
                Ok(vec![DataNode::leaf(schema_id, value)])
            }
            SchemaNodeKind::LeafList { leaf_type } => {
                let JsonValue::Array(items) = value else {
                    return Err(CodecError::InvalidDocument {
                        message: format!("leaf-list '{}' must be an array", schema.name),
                    });
                };
                items
                    .iter()
                    .map(|item| {
                        leaf_from_json(*leaf_type, item)
                            .map(|value| DataNode::leaf_list_entry(schema_id.clone(), value))
                            .map_err(|message| CodecError::InvalidValue {
                                leaf: schema.name.clone(),
                                message,
                            })
                    })
                    .collect()
            }
        }
    }

    fn decode_list_entry(
        &self,
        schema: &SchemaNode,
        keys: &[String],
        entry: &JsonValue,
    ) -> Result<DataNode, CodecError> {
        let object = expect_object(&schema.name, entry)?;

        let mut key_leaves = Vec::with_capacity(keys.len());
        for key in keys {
            let raw = object
                .iter()
                .find(|(member, _)| split_member(member).1 == key.as_str())
                .map(|(_, value)| value)
                .ok_or_else(|| CodecError::InvalidDocument {
                    message: format!("list entry '{}' is missing key '{}'", schema.name, key),
                })?;
            let leaf_type = schema
                .child(key)
                .and_then(SchemaNode::leaf_type)
                .ok_or_else(|| CodecError::InvalidDocument {
                    message: format!("list '{}' has no key leaf '{}'", schema.name, key),
                })?;
            let value =
                leaf_from_json(leaf_type, raw).map_err(|message| CodecError::InvalidValue {
                    leaf: key.clone(),
                    message,
                })?;
            key_leaves.push(KeyLeaf::new(
                SchemaId::new(key.as_str(), schema.namespace()),
                value,
            ));
        }

        let list_key = ListKey::new(
            SchemaId::new(schema.name.as_str(), schema.namespace()),
            key_leaves,
        );
        let mut inner = InnerNode::new(list_key.into(), DataNodeType::MultiInstanceNode);
        for child in self.decode_members(Some(schema), object)? {
            inner.add_child(child);
        }
        Ok(inner.into())
    }

    /// Member name for a node whose parent lives in `parent_namespace`.
    fn member_name(&self, schema: &SchemaId, parent_namespace: Option<&str>) -> String {
        let namespace = schema.namespace();
        if namespace.is_some() && namespace == parent_namespace {
            return schema.name().to_string();
        }
        match namespace.and_then(|ns| self.schema.module_for_namespace(ns)) {
            Some(module) => format!("{}:{}", module.name, schema.name()),
            None => schema.name().to_string(),
        }
    }

    fn encode_into(
        &self,
        object: &mut Map<String, JsonValue>,
        node: &DataNode,
        parent_namespace: Option<&str>,
    ) {
        let name = self.member_name(node.schema_id(), parent_namespace);
        let value = match node {
            DataNode::Inner(inner) => self.encode_children(inner),
            DataNode::Leaf(leaf) => leaf_to_json(leaf.value()),
        };
        match node.node_type() {
            DataNodeType::MultiInstanceNode | DataNodeType::MultiInstanceLeafValueNode => {
                let slot = object
                    .entry(name)
                    .or_insert_with(|| JsonValue::Array(Vec::new()));
                match slot {
                    JsonValue::Array(items) => items.push(value),
                    other => *other = JsonValue::Array(vec![value]),
                }
            }
            _ => {
                object.insert(name, value);
            }
        }
    }

    fn encode_children(&self, inner: &InnerNode) -> JsonValue {
        let namespace = inner.key().schema_id().namespace();
        let mut object = Map::new();
        for child in inner.children().values() {
            self.encode_into(&mut object, child, namespace);
        }
        JsonValue::Object(object)
    }
}

impl DocumentCodec for JsonCodec {
    fn path_to_resource_id(&self, path: &UriPath) -> Result<ResourceId, CodecError> {
        self.resolve(path).map(|(id, _)| id)
    }

    fn document_to_resource_data(
        &self,
        path: &UriPath,
        document: &Document,
    ) -> Result<ResourceData, CodecError> {
        let object = document
            .as_object()
            .ok_or_else(|| CodecError::InvalidDocument {
                message: "document must be a JSON object".to_string(),
            })?;

        let (id, target) = self.resolve(path)?;
        if let Some(target) = target.filter(|target| target.is_leaf()) {
            return Err(CodecError::InvalidDocument {
                message: format!("cannot decode a document beneath leaf '{}'", target.name),
            });
        }

        let nodes = self.decode_members(target, object)?;
        if path.is_root() {
            let mut wrapper = InnerNode::root();
            for node in nodes {
                wrapper.add_child(node);
            }
            return Ok(ResourceData::new(None, vec![wrapper.into()]));
        }
        Ok(ResourceData::new(Some(id), nodes))
    }

    fn resource_data_to_document(
        &self,
        id: &ResourceId,
        node: &DataNode,
    ) -> Result<Document, CodecError> {
        if node.schema_id().is_root() {
            return Ok(match node {
                DataNode::Inner(inner) => self.encode_children(inner),
                DataNode::Leaf(_) => JsonValue::Object(Map::new()),
            });
        }

        let parent = id.parent();
        let parent_namespace = parent
            .as_ref()
            .and_then(ResourceId::last_key)
            .and_then(|key| key.schema_id().namespace());
        let mut object = Map::new();
        self.encode_into(&mut object, node, parent_namespace);
        Ok(JsonValue::Object(object))
    }

    fn rpc_output_to_envelope(
        &self,
        id: &ResourceId,
        output: RpcOutput,
    ) -> Result<RestconfRpcOutput, CodecError> {
        let document = output
            .output()
            .map(|node| self.resource_data_to_document(id, node))
            .transpose()?;
        Ok(RestconfRpcOutput::new(output.status().into(), document))
    }
}

fn split_member(member: &str) -> (Option<&str>, &str) {
    match member.split_once(':') {
        Some((module, name)) => (Some(module), name),
        None => (None, member),
    }
}

fn expect_object<'a>(
    name: &str,
    value: &'a JsonValue,
) -> Result<&'a Map<String, JsonValue>, CodecError> {
    value.as_object().ok_or_else(|| CodecError::InvalidDocument {
        message: format!("'{}' must be a JSON object", name),
    })
}
