use super::{
    RpcHandler, RpcHandlerError, RpcHandlerFuture, RpcServiceEndpoint, RpcServiceEndpointError,
};
use rpcwire::serializer::{AnySerializer, Serializer};
use rpcwire_rpc_service::RpcMethod;
use std::{collections::hash_map::Entry, future::Future, sync::Arc};

/// Registration surface shared by the endpoint itself and everything that
/// wraps one (such as [`RpcServer`](crate::RpcServer)).
#[async_trait::async_trait]
pub trait RpcServiceEndpointInterface: Send + Sync {
    fn service_endpoint(&self) -> &RpcServiceEndpoint;

    /// Registers a handler working on raw payload bytes.
    ///
    /// Fails with [`RpcServiceEndpointError::DuplicateMethod`] if the name is
    /// taken; the existing handler stays in place.
    async fn register<F, Fut>(
        &self,
        service_method: &str,
        handler: F,
    ) -> Result<(), RpcServiceEndpointError>
    where
        F: Fn(AnySerializer, Vec<u8>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>, RpcHandlerError>> + Send + 'static,
    {
        let mut handlers = self.service_endpoint().handlers.write().await;

        match handlers.entry(service_method.to_owned()) {
            Entry::Occupied(_) => Err(RpcServiceEndpointError::DuplicateMethod(
                service_method.to_owned(),
            )),
            Entry::Vacant(entry) => {
                let wrapped: RpcHandler =
                    Arc::new(move |serializer: AnySerializer, bytes: Vec<u8>| {
                        Box::pin(handler(serializer, bytes)) as RpcHandlerFuture
                    });
                entry.insert(wrapped);

                tracing::debug!("Registered handler for `{}`", service_method);
                Ok(())
            }
        }
    }

    /// Registers a typed handler for method `M`. Arguments and results are
    /// converted with the connection's serializer.
    async fn register_method<M, F, Fut>(&self, handler: F) -> Result<(), RpcServiceEndpointError>
    where
        M: RpcMethod + Send + Sync + 'static,
        F: Fn(M::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M::Output, RpcHandlerError>> + Send + 'static,
    {
        self.register(M::METHOD, move |serializer: AnySerializer, bytes: Vec<u8>| {
            let call = serializer
                .unmarshal::<M::Input>(&bytes)
                .map(|input| handler(input));

            async move {
                let output = call?.await?;
                Ok::<_, RpcHandlerError>(serializer.marshal(&output)?)
            }
        })
        .await
    }
}
