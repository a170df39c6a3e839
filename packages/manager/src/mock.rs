//! Mock collaborators for testing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use restconf_core::{
    CodecError, ConfigStore, DataNode, Document, DocumentCodec, Filter, InnerNode, ResourceData,
    ResourceId, RestconfRpcOutput, RpcInput, RpcOutput, RpcOutputStatus, SchemaId, StoreError,
    UriPath,
};
use serde_json::json;

pub const NS: &str = "urn:example:test";

/// A store call, with identifiers in their display form.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    Exists(String),
    Read { id: String, filter: Filter },
    Create { parent: String, node: DataNode },
    Replace { parent: String, node: DataNode },
    Update { parent: String, node: DataNode },
    Delete(String),
    InvokeRpc { id: String, input: DataNode },
}

impl StoreCall {
    fn is_mutation(&self) -> bool {
        !matches!(self, StoreCall::Exists(_) | StoreCall::Read { .. })
    }
}

/// A store that records every call and tracks which identifiers exist.
#[derive(Clone, Default)]
pub struct RecordingStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    existing: Arc<Mutex<HashSet<String>>>,
    failure: Arc<Mutex<Option<StoreError>>>,
    rpc_output: Arc<Mutex<Option<RpcOutput>>>,
    rpc_delay: Arc<Mutex<Option<Duration>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier (in display form) as existing.
    pub fn with_existing(self, id: impl Into<String>) -> Self {
        self.existing.lock().unwrap().insert(id.into());
        self
    }

    /// Fail every call with `error`.
    pub fn fail_with(self, error: StoreError) -> Self {
        *self.failure.lock().unwrap() = Some(error);
        self
    }

    pub fn with_rpc_output(self, output: RpcOutput) -> Self {
        *self.rpc_output.lock().unwrap() = Some(output);
        self
    }

    /// Make RPCs take `delay` before completing.
    pub fn with_rpc_delay(self, delay: Duration) -> Self {
        *self.rpc_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls other than existence checks and reads.
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(StoreCall::is_mutation)
            .collect()
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConfigStore for RecordingStore {
    fn exists(&self, id: &ResourceId) -> Result<bool, StoreError> {
        self.record(StoreCall::Exists(id.to_string()))?;
        Ok(self.existing.lock().unwrap().contains(&id.to_string()))
    }

    fn read(&self, id: &ResourceId, filter: &Filter) -> Result<DataNode, StoreError> {
        self.record(StoreCall::Read {
            id: id.to_string(),
            filter: filter.clone(),
        })?;
        if !self.existing.lock().unwrap().contains(&id.to_string()) {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        let schema = id
            .last_key()
            .map(|key| key.schema_id().clone())
            .unwrap_or_else(SchemaId::root);
        Ok(DataNode::container(schema))
    }

    fn create(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        let id = parent.child(node.key().clone()).to_string();
        self.record(StoreCall::Create {
            parent: parent.to_string(),
            node,
        })?;
        self.existing.lock().unwrap().insert(id);
        Ok(())
    }

    fn replace(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        self.record(StoreCall::Replace {
            parent: parent.to_string(),
            node,
        })
    }

    fn update(&self, parent: &ResourceId, node: DataNode) -> Result<(), StoreError> {
        self.record(StoreCall::Update {
            parent: parent.to_string(),
            node,
        })
    }

    fn delete(&self, id: &ResourceId) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(id.to_string()))?;
        self.existing.lock().unwrap().remove(&id.to_string());
        Ok(())
    }

    async fn invoke_rpc(&self, id: &ResourceId, input: RpcInput) -> Result<RpcOutput, StoreError> {
        self.record(StoreCall::InvokeRpc {
            id: id.to_string(),
            input: input.into_data(),
        })?;
        let delay = *self.rpc_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let output = self.rpc_output.lock().unwrap().clone();
        Ok(output.unwrap_or_else(|| RpcOutput::new(RpcOutputStatus::NoData, None)))
    }
}

/// A schemaless codec.
///
/// Every path segment resolves to a plain key in [`NS`]; key values become a
/// single `key` leaf. Objects decode to containers and anything else to a
/// string leaf. The segment name `unknown` fails to resolve.
#[derive(Clone, Default)]
pub struct StubCodec {
    parsed_at: Arc<Mutex<Vec<String>>>,
}

impl StubCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths documents were parsed at, in order.
    pub fn parsed_at(&self) -> Vec<String> {
        self.parsed_at.lock().unwrap().clone()
    }

    fn decode(name: &str, value: &Document) -> DataNode {
        match value.as_object() {
            Some(members) => members.iter().fold(
                DataNode::container(SchemaId::new(name, NS)),
                |node, (child, value)| node.with_child(Self::decode(child, value)),
            ),
            None => {
                let text = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_string);
                DataNode::leaf(SchemaId::new(name, NS), text)
            }
        }
    }
}

impl DocumentCodec for StubCodec {
    fn path_to_resource_id(&self, path: &UriPath) -> Result<ResourceId, CodecError> {
        let mut builder = ResourceId::root().copy_builder();
        for segment in path.segments() {
            if segment.name() == "unknown" {
                return Err(CodecError::MalformedPath {
                    path: path.to_string(),
                    message: "unknown node 'unknown'".to_string(),
                });
            }
            builder = builder.add_branch_point_schema(segment.name(), NS);
            for value in segment.keys().unwrap_or_default() {
                builder = builder.add_key_leaf("key", NS, value.as_str())?;
            }
        }
        Ok(builder.build())
    }

    fn document_to_resource_data(
        &self,
        path: &UriPath,
        document: &Document,
    ) -> Result<ResourceData, CodecError> {
        self.parsed_at.lock().unwrap().push(path.to_string());
        let members = document
            .as_object()
            .ok_or_else(|| CodecError::InvalidDocument {
                message: "document must be a JSON object".to_string(),
            })?;
        let nodes: Vec<DataNode> = members
            .iter()
            .map(|(name, value)| Self::decode(name, value))
            .collect();

        if path.is_root() {
            let wrapper = nodes
                .into_iter()
                .fold(DataNode::from(InnerNode::root()), DataNode::with_child);
            return Ok(ResourceData::new(None, vec![wrapper]));
        }
        let id = self.path_to_resource_id(path)?;
        Ok(ResourceData::new(Some(id), nodes))
    }

    fn resource_data_to_document(
        &self,
        _id: &ResourceId,
        node: &DataNode,
    ) -> Result<Document, CodecError> {
        Ok(json!({"name": node.schema_id().name()}))
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
