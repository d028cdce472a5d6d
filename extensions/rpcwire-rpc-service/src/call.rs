use crate::{RpcCallerError, RpcClientInterface, RpcMethod};

/// Calls method `T` through `rpc_client`.
pub async fn call_method<T, C>(rpc_client: &C, input: T::Input) -> Result<T::Output, RpcCallerError>
where
    T: RpcMethod,
    C: RpcClientInterface + Send + Sync,
{
    rpc_client
        .call_rpc::<T::Input, T::Output>(T::METHOD, &input)
        .await
}

/// Lets call sites write `Add::call(&client, input)`.
///
/// Blanket-implemented for every [`RpcMethod`].
#[async_trait::async_trait]
pub trait RpcCall: RpcMethod + Sized + Send + Sync {
    async fn call<C>(rpc_client: &C, input: Self::Input) -> Result<Self::Output, RpcCallerError>
    where
        C: RpcClientInterface + Send + Sync;
}

#[async_trait::async_trait]
impl<T> RpcCall for T
where
    T: RpcMethod + Send + Sync + 'static,
{
    async fn call<C>(rpc_client: &C, input: Self::Input) -> Result<Self::Output, RpcCallerError>
    where
        C: RpcClientInterface + Send + Sync,
    {
        call_method::<T, C>(rpc_client, input).await
    }
}
