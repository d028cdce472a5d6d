use rpcwire_rpc_service::{RpcCall, RpcCallerError, RpcClientInterface, RpcMethod};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pair {
    a: i64,
    b: i64,
}

struct Add;

impl RpcMethod for Add {
    const METHOD: &'static str = "Arith.Add";
    type Input = Pair;
    type Output = i64;
}

struct Missing;

impl RpcMethod for Missing {
    const METHOD: &'static str = "Arith.Missing";
    type Input = ();
    type Output = ();
}

/// Answers calls in-process, recording the method names it was asked for.
#[derive(Default)]
struct MockRpcClient {
    seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl RpcClientInterface for MockRpcClient {
    async fn call_rpc<P, R>(&self, service_method: &str, args: &P) -> Result<R, RpcCallerError>
    where
        P: Serialize + Send + Sync + ?Sized,
        R: DeserializeOwned + Send + 'static,
    {
        self.seen.lock().unwrap().push(service_method.to_owned());

        let args = serde_json::to_value(args).unwrap();
        let reply = match service_method {
            "Arith.Add" => Value::from(args["a"].as_i64().unwrap() + args["b"].as_i64().unwrap()),
            other => return Err(RpcCallerError::Remote(format!("rpc: can't find method {}", other))),
        };

        Ok(serde_json::from_value(reply).unwrap())
    }
}

#[tokio::test]
async fn typed_call_routes_on_method_name() {
    let client = MockRpcClient::default();

    let sum = Add::call(&client, Pair { a: 2, b: 40 }).await.unwrap();

    assert_eq!(sum, 42);
    assert_eq!(*client.seen.lock().unwrap(), vec!["Arith.Add".to_string()]);
}

#[tokio::test]
async fn remote_errors_reach_the_caller() {
    let client = MockRpcClient::default();

    match Missing::call(&client, ()).await {
        Err(RpcCallerError::Remote(msg)) => assert_eq!(msg, "rpc: can't find method Arith.Missing"),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[test]
fn caller_errors_render_their_cause() {
    assert_eq!(RpcCallerError::Aborted.to_string(), "RPC call aborted");
    assert_eq!(
        RpcCallerError::NotFoundSerializer(9).to_string(),
        "no serializer registered for code 9"
    );
}
