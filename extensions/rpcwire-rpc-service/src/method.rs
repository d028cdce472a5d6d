use serde::{Serialize, de::DeserializeOwned};

/// Couples a method name with its argument and result types.
///
/// Both peers route on [`METHOD`](Self::METHOD), so a definition is usually
/// shared between the client and server crates.
pub trait RpcMethod {
    /// Name the server registers the handler under, e.g. `"Arith.Add"`.
    const METHOD: &'static str;

    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;

    type Output: Serialize + DeserializeOwned + Send + 'static;
}
