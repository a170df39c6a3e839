//! In-memory configuration store.
//!
//! A reference [`ConfigStore`](restconf_core::ConfigStore) that keeps the
//! whole tree in memory behind a lock:
//! - `InMemoryConfigStore`: the store
//! - `RpcHandler`: procedures registered on the store and run by `invoke_rpc`

mod in_memory;
mod rpc_handler;
mod tree_utils;

pub use in_memory::InMemoryConfigStore;
pub use rpc_handler::RpcHandler;
