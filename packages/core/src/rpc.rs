//! Remote procedure call input, output, and the protocol-level envelope.

use serde::{Deserialize, Serialize};

use crate::data_node::DataNode;
use crate::traits::Document;

/// Input of a remote procedure: a single tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcInput {
    input: DataNode,
}

impl RpcInput {
    pub fn new(input: DataNode) -> Self {
        Self { input }
    }

    pub fn data(&self) -> &DataNode {
        &self.input
    }

    pub fn into_data(self) -> DataNode {
        self.input
    }
}

/// How a store classifies the result of a remote procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcOutputStatus {
    Success,
    Failure,
    /// The procedure ran but produced no output.
    NoData,
    Timeout,
}

/// Result of a remote procedure as reported by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcOutput {
    status: RpcOutputStatus,
    output: Option<DataNode>,
}

impl RpcOutput {
    pub fn new(status: RpcOutputStatus, output: Option<DataNode>) -> Self {
        Self { status, output }
    }

    pub fn success(output: DataNode) -> Self {
        Self::new(RpcOutputStatus::Success, Some(output))
    }

    pub fn status(&self) -> RpcOutputStatus {
        self.status
    }

    pub fn output(&self) -> Option<&DataNode> {
        self.output.as_ref()
    }

    pub fn into_output(self) -> Option<DataNode> {
        self.output
    }
}

/// Protocol-level status of an RPC response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpcStatus {
    Success,
    NoContent,
    Failed,
    Timeout,
    BadRequest,
    InternalError,
}

impl RpcStatus {
    /// Check if this status reports an error to the client.
    pub fn is_error(&self) -> bool {
        !matches!(self, RpcStatus::Success | RpcStatus::NoContent)
    }
}

impl From<RpcOutputStatus> for RpcStatus {
    fn from(status: RpcOutputStatus) -> Self {
        match status {
            RpcOutputStatus::Success => RpcStatus::Success,
            RpcOutputStatus::Failure => RpcStatus::Failed,
            RpcOutputStatus::NoData => RpcStatus::NoContent,
            RpcOutputStatus::Timeout => RpcStatus::Timeout,
        }
    }
}

/// The envelope returned to RESTCONF clients for an RPC.
///
/// Every RPC invocation completes with one of these, including failed ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestconfRpcOutput {
    pub status: RpcStatus,

    /// Output document, when the procedure produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Document>,

    /// Human-readable reason, set on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RestconfRpcOutput {
    pub fn new(status: RpcStatus, output: Option<Document>) -> Self {
        Self {
            status,
            output,
            reason: None,
        }
    }

    /// An internal-error envelope carrying a reason.
    pub fn internal_error(reason: impl Into<String>) -> Self {
        Self::new(RpcStatus::InternalError, None).with_reason(reason)
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(RpcStatus::from(RpcOutputStatus::Success), RpcStatus::Success);
        assert_eq!(RpcStatus::from(RpcOutputStatus::Failure), RpcStatus::Failed);
        assert_eq!(RpcStatus::from(RpcOutputStatus::NoData), RpcStatus::NoContent);
        assert_eq!(RpcStatus::from(RpcOutputStatus::Timeout), RpcStatus::Timeout);
    }

    #[test]
    fn error_classification() {
        assert!(!RpcStatus::Success.is_error());
        assert!(!RpcStatus::NoContent.is_error());
        assert!(RpcStatus::InternalError.is_error());
        assert!(RpcStatus::Timeout.is_error());
    }

    #[test]
    fn internal_error_envelope() {
        let envelope = RestconfRpcOutput::internal_error("boom");
        assert_eq!(envelope.status, RpcStatus::InternalError);
        assert_eq!(envelope.reason.as_deref(), Some("boom"));
        assert!(envelope.output.is_none());
        assert!(envelope.is_error());
    }

    #[test]
    fn envelope_serializes_without_empty_fields() {
        let envelope = RestconfRpcOutput::new(RpcStatus::NoContent, None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({"status": "no-content"}));
    }
}
