use crate::RpcCallerError;
use serde::{Serialize, de::DeserializeOwned};

/// Anything that can carry a call to a remote method and bring back its result.
///
/// Implemented by the Tokio client; tests can implement it with an
/// in-process stand-in.
#[async_trait::async_trait]
pub trait RpcClientInterface {
    async fn call_rpc<P, R>(&self, service_method: &str, args: &P) -> Result<R, RpcCallerError>
    where
        P: Serialize + Send + Sync + ?Sized,
        R: DeserializeOwned + Send + 'static;
}
