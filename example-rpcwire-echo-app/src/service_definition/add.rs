use rpcwire_rpc_service::RpcMethod;

pub struct Add;

impl RpcMethod for Add {
    const METHOD: &'static str = "Arith.Add";

    type Input = Vec<f64>;
    type Output = f64;
}
