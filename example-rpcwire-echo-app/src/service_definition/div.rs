use rpcwire_rpc_service::RpcMethod;

/// Integer division; dividing by zero or overflowing fails on the server.
pub struct Div;

impl RpcMethod for Div {
    const METHOD: &'static str = "Arith.Div";

    /// `(dividend, divisor)`
    type Input = (i64, i64);
    type Output = i64;
}
