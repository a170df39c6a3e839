//! Core RESTCONF: Typed Configuration Tree Layer
//!
//! This layer gives meaning to the resources a RESTCONF client addresses:
//! - `UriPath`: Syntactically validated request path (`module:name=key1,key2`)
//! - `ResourceId`: Schema-qualified node keys from the tree root to a node
//! - `DataNode`: The typed configuration tree (containers, list entries, leaves)
//! - `ResourceData`: A parent identifier paired with the nodes parsed under it
//!
//! It also defines the two collaborator seams the manager is written against:
//! - `ConfigStore`: existence checks, CRUD and RPC execution on the tree
//! - `DocumentCodec`: conversion between JSON documents and tree nodes
//!
//! # Example
//!
//! ```rust
//! use restconf_core::{ResourceId, UriPath};
//!
//! let path = UriPath::parse("/devices/device=1/port=2").unwrap();
//! assert_eq!(path.len(), 3);
//!
//! let id = ResourceId::builder()
//!     .add_branch_point_schema("devices", "urn:example:net")
//!     .add_branch_point_schema("device", "urn:example:net")
//!     .add_key_leaf("id", "urn:example:net", 1u64)
//!     .unwrap()
//!     .build();
//! assert_eq!(id.to_string(), "/devices/device[id=1]");
//! ```

mod data_node;
mod error;
mod node_key;
mod resource_data;
mod resource_id;
mod rpc;
mod traits;
mod uri_path;
mod value;

pub use data_node::{DataNode, DataNodeType, InnerNode, LeafNode};
pub use error::{CodecError, ModelError, PathError, StoreError};
pub use node_key::{KeyLeaf, ListKey, NodeKey, SchemaId, ROOT_SCHEMA_NAME};
pub use resource_data::ResourceData;
pub use resource_id::{ResourceId, ResourceIdBuilder};
pub use rpc::{RestconfRpcOutput, RpcInput, RpcOutput, RpcOutputStatus, RpcStatus};
pub use traits::{ConfigStore, Document, DocumentCodec, Filter};
pub use uri_path::{PathSegment, UriPath};
pub use value::LeafValue;
