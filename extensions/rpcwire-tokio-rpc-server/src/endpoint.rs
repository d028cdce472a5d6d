use super::RpcServiceEndpointInterface;
use rpcwire::serializer::AnySerializer;
use std::collections::HashMap;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio::sync::RwLock;

/// Error a handler fails with. Only its text reaches the caller.
pub type RpcHandlerError = Box<dyn std::error::Error + Send + Sync>;

pub type RpcHandlerFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, RpcHandlerError>> + Send>>;

/// Type-erased handler: takes the connection's serializer and the request
/// payload, and produces the serialized result.
pub type RpcHandler = Arc<dyn Fn(AnySerializer, Vec<u8>) -> RpcHandlerFuture + Send + Sync>;

/// Explicit registry of handlers, keyed by method name (e.g. `"Arith.Add"`).
///
/// Lookups happen on every request and only take the read lock.
#[derive(Default)]
pub struct RpcServiceEndpoint {
    pub(crate) handlers: RwLock<HashMap<String, RpcHandler>>,
}

impl RpcServiceEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handler registered under `service_method`, if any.
    pub async fn handler(&self, service_method: &str) -> Option<RpcHandler> {
        self.handlers.read().await.get(service_method).cloned()
    }

    pub async fn is_registered(&self, service_method: &str) -> bool {
        self.handlers.read().await.contains_key(service_method)
    }

    /// Registered method names, sorted.
    pub async fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl RpcServiceEndpointInterface for RpcServiceEndpoint {
    fn service_endpoint(&self) -> &RpcServiceEndpoint {
        self
    }
}
