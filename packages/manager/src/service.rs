//! The RESTCONF service surface and the manager that implements it.

use std::fmt;
use std::sync::Arc;

use restconf_core::{ConfigStore, Document, DocumentCodec, UriPath};
use tracing::info;
use url::Url;

use crate::config::ManagerConfig;
use crate::engine::ResourceEngine;
use crate::error::{RestconfError, Result};
use crate::rpc::{CallerContext, RpcDispatcher, RpcFuture};

/// Default URL prefix of RESTCONF resources.
pub const RESTCONF_ROOT: &str = "/restconf";

/// A RESTCONF resource method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    /// Check if requests with this verb carry a document.
    pub fn has_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put | Verb::Patch)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl TryFrom<&http::Method> for Verb {
    type Error = RestconfError;

    fn try_from(method: &http::Method) -> Result<Self> {
        match method.as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(RestconfError::UnsupportedVerb {
                method: method.to_string(),
            }),
        }
    }
}

impl TryFrom<http::Method> for Verb {
    type Error = RestconfError;

    fn try_from(method: http::Method) -> Result<Self> {
        Verb::try_from(&method)
    }
}

impl From<Verb> for http::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => http::Method::GET,
            Verb::Post => http::Method::POST,
            Verb::Put => http::Method::PUT,
            Verb::Patch => http::Method::PATCH,
            Verb::Delete => http::Method::DELETE,
        }
    }
}

/// A resource request, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Get { path: UriPath },
    Post { path: UriPath, document: Document },
    Put { path: UriPath, document: Document },
    Patch { path: UriPath, document: Document },
    Delete { path: UriPath },
}

impl Operation {
    /// Build an operation. Post, put and patch require a document.
    pub fn new(verb: Verb, path: UriPath, document: Option<Document>) -> Result<Self> {
        let body = |document: Option<Document>| {
            document.ok_or_else(|| RestconfError::MalformedDocument {
                message: format!("{} requires a request body", verb),
            })
        };
        Ok(match verb {
            Verb::Get => Operation::Get { path },
            Verb::Delete => Operation::Delete { path },
            Verb::Post => Operation::Post {
                path,
                document: body(document)?,
            },
            Verb::Put => Operation::Put {
                path,
                document: body(document)?,
            },
            Verb::Patch => Operation::Patch {
                path,
                document: body(document)?,
            },
        })
    }

    /// Build an operation from an HTTP request served under `root`.
    pub fn from_request(
        method: &http::Method,
        url: &Url,
        root: &str,
        document: Option<Document>,
    ) -> Result<Self> {
        let verb = Verb::try_from(method)?;
        let path = UriPath::from_url(url, root).map_err(|e| RestconfError::MalformedPath {
            path: url.path().to_string(),
            message: e.to_string(),
        })?;
        Self::new(verb, path, document)
    }

    pub fn verb(&self) -> Verb {
        match self {
            Operation::Get { .. } => Verb::Get,
            Operation::Post { .. } => Verb::Post,
            Operation::Put { .. } => Verb::Put,
            Operation::Patch { .. } => Verb::Patch,
            Operation::Delete { .. } => Verb::Delete,
        }
    }

    pub fn path(&self) -> &UriPath {
        match self {
            Operation::Get { path }
            | Operation::Post { path, .. }
            | Operation::Put { path, .. }
            | Operation::Patch { path, .. }
            | Operation::Delete { path } => path,
        }
    }
}

/// The operations a RESTCONF server front end calls.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn RestconfService>`.
pub trait RestconfService: Send + Sync {
    /// URL prefix under which resources are served.
    fn root_path(&self) -> &str;

    /// Read a node. `Ok(None)` means the node does not exist.
    fn get(&self, path: &UriPath) -> Result<Option<Document>>;

    fn post(&self, path: &UriPath, document: &Document) -> Result<()>;

    fn put(&self, path: &UriPath, document: &Document) -> Result<()>;

    fn patch(&self, path: &UriPath, document: &Document) -> Result<()>;

    fn delete(&self, path: &UriPath) -> Result<()>;

    /// Start a remote procedure. Returns before the procedure runs.
    fn invoke_rpc(&self, path: &UriPath, document: Document, caller: CallerContext)
        -> RpcFuture;

    /// Run a resource operation. Only reads return a document.
    fn dispatch(&self, operation: Operation) -> Result<Option<Document>> {
        match operation {
            Operation::Get { path } => self.get(&path),
            Operation::Post { path, document } => self.post(&path, &document).map(|()| None),
            Operation::Put { path, document } => self.put(&path, &document).map(|()| None),
            Operation::Patch { path, document } => self.patch(&path, &document).map(|()| None),
            Operation::Delete { path } => self.delete(&path).map(|()| None),
        }
    }
}

/// Translates RESTCONF requests into calls on a configuration store.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use restconf_core::UriPath;
/// use restconf_json_codec::{JsonCodec, Module, SchemaContext, SchemaNode};
/// use restconf_manager::{ManagerConfig, RestconfManager, RestconfService};
/// use restconf_memory_store::InMemoryConfigStore;
/// use serde_json::json;
///
/// let schema = SchemaContext::new().with_module(
///     Module::new("sys", "urn:example:sys").with_node(SchemaNode::container("system")),
/// );
/// let manager = RestconfManager::start(
///     Arc::new(InMemoryConfigStore::new()),
///     Arc::new(JsonCodec::new(schema)),
///     ManagerConfig::default(),
/// )
/// .unwrap();
///
/// manager.post(&UriPath::root(), &json!({"sys:system": {}})).unwrap();
/// let system = manager.get(&UriPath::parse("/system").unwrap()).unwrap();
/// assert_eq!(system, Some(json!({"sys:system": {}})));
///
/// manager.shutdown();
/// ```
pub struct RestconfManager<S, C> {
    config: ManagerConfig,
    engine: ResourceEngine<S, C>,
    rpc: RpcDispatcher<S, C>,
}

impl<S, C> RestconfManager<S, C>
where
    S: ConfigStore + 'static,
    C: DocumentCodec + 'static,
{
    /// Start the RPC worker pool. Fails if the configuration is invalid.
    pub fn start(store: Arc<S>, codec: Arc<C>, config: ManagerConfig) -> Result<Self> {
        let rpc = RpcDispatcher::start(Arc::clone(&store), Arc::clone(&codec), &config)?;
        let engine = ResourceEngine::new(store, codec);
        info!(
            root = %config.root_path,
            worker_threads = config.worker_threads,
            "Started"
        );
        Ok(Self {
            config,
            engine,
            rpc,
        })
    }

    /// Stop the RPC worker pool. Pending invocations are interrupted.
    pub fn shutdown(&self) {
        self.rpc.shutdown();
        info!("Stopped");
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn engine(&self) -> &ResourceEngine<S, C> {
        &self.engine
    }
}

impl<S, C> RestconfService for RestconfManager<S, C>
where
    S: ConfigStore + 'static,
    C: DocumentCodec + 'static,
{
    fn root_path(&self) -> &str {
        &self.config.root_path
    }

    fn get(&self, path: &UriPath) -> Result<Option<Document>> {
        self.engine.get(path)
    }

    fn post(&self, path: &UriPath, document: &Document) -> Result<()> {
        self.engine.post(path, document)
    }

    fn put(&self, path: &UriPath, document: &Document) -> Result<()> {
        self.engine.put(path, document)
    }

    fn patch(&self, path: &UriPath, document: &Document) -> Result<()> {
        self.engine.patch(path, document)
    }

    fn delete(&self, path: &UriPath) -> Result<()> {
        self.engine.delete(path)
    }

    fn invoke_rpc(
        &self,
        path: &UriPath,
        document: Document,
        caller: CallerContext,
    ) -> RpcFuture {
        self.rpc.invoke(path, document, caller)
    }
}
