use rpcwire_rpc_service::RpcMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoArgs {
    pub x: i64,
}

pub struct Echo;

impl RpcMethod for Echo {
    const METHOD: &'static str = "Svc.Echo";

    type Input = EchoArgs;
    type Output = EchoArgs;
}
