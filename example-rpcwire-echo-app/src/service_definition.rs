mod add;
pub use add::Add;
mod div;
pub use div::Div;
mod echo;
pub use echo::{Echo, EchoArgs};

use rpcwire_tokio_rpc_server::{
    RpcHandlerError, RpcServiceEndpointError, RpcServiceEndpointInterface,
};

/// Registers every example method on `endpoint`.
pub async fn register_services<E>(endpoint: &E) -> Result<(), RpcServiceEndpointError>
where
    E: RpcServiceEndpointInterface,
{
    endpoint
        .register_method::<Echo, _, _>(|args| async move { Ok::<_, RpcHandlerError>(args) })
        .await?;

    endpoint
        .register_method::<Add, _, _>(|numbers: Vec<f64>| async move {
            Ok::<_, RpcHandlerError>(numbers.iter().sum::<f64>())
        })
        .await?;

    endpoint
        .register_method::<Div, _, _>(|(dividend, divisor)| async move {
            if divisor == 0 {
                return Err(RpcHandlerError::from("division by zero"));
            }
            // `i64::MIN / -1` does not fit.
            dividend
                .checked_div(divisor)
                .ok_or_else(|| RpcHandlerError::from("division overflow"))
        })
        .await?;

    Ok(())
}
