//! Procedures that can be registered on an in-memory store.

use std::future::Future;

use async_trait::async_trait;
use restconf_core::{RpcInput, RpcOutput, StoreError};

/// A remote procedure implementation.
///
/// Any `Fn(RpcInput) -> impl Future<Output = Result<RpcOutput, StoreError>>`
/// closure is a handler.
#[async_trait]
pub trait RpcHandler: Send + Sync {
    async fn call(&self, input: RpcInput) -> Result<RpcOutput, StoreError>;
}

#[async_trait]
impl<F, Fut> RpcHandler for F
where
    F: Fn(RpcInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<RpcOutput, StoreError>> + Send + 'static,
{
    async fn call(&self, input: RpcInput) -> Result<RpcOutput, StoreError> {
        (self)(input).await
    }
}
