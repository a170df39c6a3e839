//! RESTCONF resource translation.
//!
//! Turns RESTCONF requests into operations on a configuration store:
//! - `ResourceEngine`: GET/POST/PUT/PATCH/DELETE as store calls
//! - `RpcDispatcher`: remote procedures on a bounded worker pool
//! - `RestconfManager`: lifecycle and the `RestconfService` surface
//!
//! The store and the document codec are collaborators, reached through the
//! [`ConfigStore`](restconf_core::ConfigStore) and
//! [`DocumentCodec`](restconf_core::DocumentCodec) traits.

pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod rpc;
pub mod service;

#[cfg(test)]
mod mock;

pub use config::ManagerConfig;
pub use engine::{parent_rooted, ResourceEngine};
pub use error::{RestconfError, Result};
pub use resolver::{parent_of, resolve};
pub use rpc::{CallerContext, RpcDispatcher, RpcFuture, EXECUTION_INTERRUPTED};
pub use service::{Operation, RestconfManager, RestconfService, Verb, RESTCONF_ROOT};
