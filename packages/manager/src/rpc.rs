//! The RPC dispatcher: remote procedures run on a bounded worker pool.
//!
//! `invoke` returns at once with an [`RpcFuture`]. The invocation itself runs
//! on a dedicated tokio runtime whose admission is bounded by a semaphore of
//! the pool's size, so invocations beyond the limit queue. Each invocation
//! makes exactly one store call and always completes with an envelope.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use restconf_core::{
    CodecError, ConfigStore, Document, DocumentCodec, RestconfRpcOutput, RpcInput, StoreError,
    UriPath,
};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{oneshot, Semaphore};
use tracing::{debug, error, info};

use crate::config::ManagerConfig;
use crate::error::Result;

/// Reason reported when an invocation is cancelled or the pool shuts down.
pub const EXECUTION_INTERRUPTED: &str = "execution interrupted";

/// Information about the client that issued an RPC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub client_address: Option<String>,
}

impl CallerContext {
    pub fn new(client_address: impl Into<String>) -> Self {
        Self {
            client_address: Some(client_address.into()),
        }
    }
}

/// Why an invocation failed before producing an envelope.
#[derive(Debug, Error)]
enum RpcFault {
    #[error("{}", EXECUTION_INTERRUPTED)]
    Interrupted,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(StoreError),

    #[error("path does not name a procedure")]
    NoProcedure,

    #[error("RPC document carries no input")]
    NoInput,
}

impl From<StoreError> for RpcFault {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Interrupted => RpcFault::Interrupted,
            other => RpcFault::Store(other),
        }
    }
}

/// The eventual result of an RPC invocation.
///
/// Always resolves to an envelope. If the invocation is abandoned (the pool
/// shut down or the task was dropped) it resolves to an internal error with
/// reason [`EXECUTION_INTERRUPTED`].
#[derive(Debug)]
pub struct RpcFuture {
    state: FutureState,
}

#[derive(Debug)]
enum FutureState {
    Pending(oneshot::Receiver<RestconfRpcOutput>),
    Ready(Option<RestconfRpcOutput>),
}

impl RpcFuture {
    fn pending(receiver: oneshot::Receiver<RestconfRpcOutput>) -> Self {
        Self {
            state: FutureState::Pending(receiver),
        }
    }

    fn ready(output: RestconfRpcOutput) -> Self {
        Self {
            state: FutureState::Ready(Some(output)),
        }
    }
}

impl Future for RpcFuture {
    type Output = RestconfRpcOutput;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            FutureState::Pending(receiver) => Pin::new(receiver)
                .poll(cx)
                .map(|result| result.unwrap_or_else(|_| interrupted())),
            FutureState::Ready(output) => Poll::Ready(output.take().unwrap_or_else(interrupted)),
        }
    }
}

fn interrupted() -> RestconfRpcOutput {
    RestconfRpcOutput::internal_error(EXECUTION_INTERRUPTED)
}

/// Runs remote procedures on a fixed-size worker pool.
pub struct RpcDispatcher<S, C> {
    store: Arc<S>,
    codec: Arc<C>,
    runtime: Mutex<Option<Runtime>>,
    permits: Arc<Semaphore>,
}

impl<S, C> RpcDispatcher<S, C>
where
    S: ConfigStore + 'static,
    C: DocumentCodec + 'static,
{
    /// Start the worker pool.
    pub fn start(store: Arc<S>, codec: Arc<C>, config: &ManagerConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name(config.thread_name.as_str())
            .enable_all()
            .build()?;
        debug!(
            worker_threads = config.worker_threads,
            thread_name = %config.thread_name,
            "RPC worker pool started"
        );

        Ok(Self {
            store,
            codec,
            runtime: Mutex::new(Some(runtime)),
            permits: Arc::new(Semaphore::new(config.worker_threads)),
        })
    }

    /// Invoke the procedure at `path` with `document` as its input.
    pub fn invoke(&self, path: &UriPath, document: Document, caller: CallerContext) -> RpcFuture {
        let (sender, receiver) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let codec = Arc::clone(&self.codec);
        let permits = Arc::clone(&self.permits);
        let path = path.clone();

        let task = async move {
            // A closed semaphore means the pool is shutting down.
            let Ok(_permit) = permits.acquire_owned().await else {
                let _ = sender.send(interrupted());
                return;
            };
            debug!(path = %path, client = ?caller.client_address, "Invoking RPC");
            let envelope = execute(&*store, &*codec, &path, &document).await;
            let _ = sender.send(envelope);
        };

        let Ok(guard) = self.runtime.lock() else {
            return RpcFuture::ready(interrupted());
        };
        match guard.as_ref() {
            Some(runtime) => {
                runtime.spawn(task);
                RpcFuture::pending(receiver)
            }
            None => RpcFuture::ready(interrupted()),
        }
    }

    /// Stop the pool without waiting for running invocations.
    ///
    /// Queued and running invocations resolve to [`EXECUTION_INTERRUPTED`].
    /// Invocations made afterwards resolve to it immediately.
    pub fn shutdown(&self) {
        self.permits.close();
        let runtime = match self.runtime.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
            info!("RPC worker pool stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.runtime
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl<S, C> Drop for RpcDispatcher<S, C> {
    fn drop(&mut self) {
        let runtime = match self.runtime.get_mut() {
            Ok(runtime) => runtime.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }
    }
}

async fn execute<S, C>(store: &S, codec: &C, path: &UriPath, document: &Document) -> RestconfRpcOutput
where
    S: ConfigStore + ?Sized,
    C: DocumentCodec + ?Sized,
{
    match try_execute(store, codec, path, document).await {
        Ok(envelope) => envelope,
        Err(fault) => {
            error!(path = %path, error = %fault, "RPC invocation failed");
            RestconfRpcOutput::internal_error(fault.to_string())
        }
    }
}

async fn try_execute<S, C>(
    store: &S,
    codec: &C,
    path: &UriPath,
    document: &Document,
) -> std::result::Result<RestconfRpcOutput, RpcFault>
where
    S: ConfigStore + ?Sized,
    C: DocumentCodec + ?Sized,
{
    let (id, nodes) = codec.document_to_resource_data(path, document)?.into_parts();
    let id = id.ok_or(RpcFault::NoProcedure)?;
    let input = nodes.into_iter().next().ok_or(RpcFault::NoInput)?;

    let output = store.invoke_rpc(&id, RpcInput::new(input)).await?;
    Ok(codec.rpc_output_to_envelope(&id, output)?)
}
