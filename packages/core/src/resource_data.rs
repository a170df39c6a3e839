//! ResourceData: nodes paired with the identifier of their parent.

use crate::data_node::DataNode;
use crate::resource_id::ResourceId;

/// Nodes decoded from a document, together with the identifier of the node
/// they live under.
///
/// An absent identifier means the nodes were decoded at the synthetic root
/// of the document and are wrapped in a root marker node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceData {
    resource_id: Option<ResourceId>,
    data_nodes: Vec<DataNode>,
}

impl ResourceData {
    pub fn new(resource_id: Option<ResourceId>, data_nodes: Vec<DataNode>) -> Self {
        Self {
            resource_id,
            data_nodes,
        }
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        self.resource_id.as_ref()
    }

    pub fn data_nodes(&self) -> &[DataNode] {
        &self.data_nodes
    }

    pub fn into_parts(self) -> (Option<ResourceId>, Vec<DataNode>) {
        (self.resource_id, self.data_nodes)
    }
}
