use example_rpcwire_echo_app::{Add, Div, Echo, EchoArgs, register_services};
use rpcwire::compressor::CompressType;
use rpcwire::serializer::{
    SerializeType, SerializerError, ValueSerializer, register_serializer,
};
use rpcwire_rpc_service::{RpcCall, RpcCallerError};
use rpcwire_tokio_rpc_client::{ClientOptions, RpcClient};
use rpcwire_tokio_rpc_server::{RpcServer, ServerOptions};
use std::net::SocketAddr;
use serde_json::Value;
use std::sync::Arc;
use tokio::join;
use tokio::net::TcpListener;

/// JSON behind a fixed four-byte tag, registered under a custom code.
struct TaggedJson;

const TAGGED_JSON_CODE: u8 = 7;

impl ValueSerializer for TaggedJson {
    fn marshal_value(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
        let mut bytes = b"RPCJ".to_vec();
        serde_json::to_writer(&mut bytes, value)?;
        Ok(bytes)
    }

    fn unmarshal_value(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
        let body = bytes
            .strip_prefix(b"RPCJ")
            .ok_or_else(|| SerializerError::custom("missing RPCJ tag"))?;
        Ok(serde_json::from_slice(body)?)
    }
}

/// Starts a server with the example services on a random loopback port.
async fn start_server(options: ServerOptions) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = RpcServer::new(options);
    register_services(&server).await.unwrap();

    tokio::spawn(async move {
        let _ = Arc::new(server).serve_with_listener(listener).await;
    });

    addr
}

#[tokio::test]
async fn test_success_client_server_roundtrip() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    let (res1, res2, res3, res4) = join!(
        Echo::call(&rpc_client, EchoArgs { x: 5 }),
        Add::call(&rpc_client, vec![1.0, 2.0, 3.0]),
        Add::call(&rpc_client, vec![8.0, 3.0, 7.0]),
        Div::call(&rpc_client, (84, 2)),
    );

    assert_eq!(res1.unwrap(), EchoArgs { x: 5 });
    assert_eq!(res2.unwrap(), 6.0);
    assert_eq!(res3.unwrap(), 18.0);
    assert_eq!(res4.unwrap(), 42);
}

#[tokio::test]
async fn test_error_client_server_roundtrip() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    match Div::call(&rpc_client, (1, 0)).await {
        Err(RpcCallerError::Remote(msg)) => assert_eq!(msg, "division by zero"),
        other => panic!("expected remote error, got {:?}", other),
    }

    // The connection survives a failed call.
    assert_eq!(Div::call(&rpc_client, (9, 3)).await.unwrap(), 3);
}

#[tokio::test]
async fn test_overflowing_division_is_an_error_reply() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    match Div::call(&rpc_client, (i64::MIN, -1)).await {
        Err(RpcCallerError::Remote(msg)) => assert_eq!(msg, "division overflow"),
        other => panic!("expected remote error, got {:?}", other),
    }

    assert_eq!(Div::call(&rpc_client, (i64::MIN, 1)).await.unwrap(), i64::MIN);
}

#[tokio::test]
async fn test_unknown_method_is_reported() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    let result = rpc_client.call::<_, ()>("Arith.Pow", &(2, 10)).await;
    match result {
        Err(RpcCallerError::Remote(msg)) => {
            assert_eq!(msg, "rpc: can't find method Arith.Pow")
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_clients_with_different_compressors_share_a_server() {
    let addr = start_server(ServerOptions::default()).await;

    let mut clients = Vec::new();
    for compress_type in [
        CompressType::RAW,
        CompressType::GZIP,
        CompressType::ZLIB,
        CompressType::SNAPPY,
    ] {
        let options = ClientOptions::default().with_compress_type(compress_type);
        clients.push(RpcClient::connect(addr, options).await.unwrap());
    }

    let numbers: Vec<f64> = (1..=100).map(f64::from).collect();
    for client in &clients {
        assert_eq!(Add::call(client, numbers.clone()).await.unwrap(), 5050.0);
    }
}

#[tokio::test]
async fn test_bitcode_serializer_roundtrip() {
    let serialize_type = SerializeType::Bitcode;
    let addr = start_server(ServerOptions::default().with_serialize_type(serialize_type)).await;

    let rpc_client = RpcClient::connect(
        addr,
        ClientOptions::default()
            .with_serialize_type(serialize_type)
            .with_compress_type(CompressType::GZIP),
    )
    .await
    .unwrap();

    assert_eq!(
        Echo::call(&rpc_client, EchoArgs { x: -7 }).await.unwrap(),
        EchoArgs { x: -7 }
    );
}

#[tokio::test]
async fn test_many_concurrent_calls() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = Arc::new(
        RpcClient::connect(addr, ClientOptions::default())
            .await
            .unwrap(),
    );

    let tasks: Vec<_> = (0..64i64)
        .map(|x| {
            let rpc_client = Arc::clone(&rpc_client);
            tokio::spawn(async move { Echo::call(rpc_client.as_ref(), EchoArgs { x }).await })
        })
        .collect();

    for (x, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap().unwrap(), EchoArgs { x: x as i64 });
    }
}

#[tokio::test]
async fn test_close_then_call_is_aborted() {
    let addr = start_server(ServerOptions::default()).await;
    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    rpc_client.close().await.unwrap();

    let result = Echo::call(&rpc_client, EchoArgs { x: 1 }).await;
    assert!(matches!(result, Err(RpcCallerError::Aborted)));
}

#[tokio::test]
async fn test_registered_serializer_roundtrip() {
    register_serializer(TAGGED_JSON_CODE, Arc::new(TaggedJson));

    let server_options = ServerOptions::default()
        .with_serializer_code(TAGGED_JSON_CODE)
        .unwrap();
    let addr = start_server(server_options).await;

    let rpc_client = RpcClient::connect(
        addr,
        ClientOptions::default()
            .with_serializer_code(TAGGED_JSON_CODE)
            .unwrap()
            .with_compress_type(CompressType::SNAPPY),
    )
    .await
    .unwrap();

    let (echoed, quotient) = join!(
        Echo::call(&rpc_client, EchoArgs { x: 12 }),
        Div::call(&rpc_client, (12, 4)),
    );
    assert_eq!(echoed.unwrap(), EchoArgs { x: 12 });
    assert_eq!(quotient.unwrap(), 3);
}

#[tokio::test]
async fn test_unregistered_serializer_code_is_refused() {
    assert!(matches!(
        ClientOptions::default().with_serializer_code(0xD0),
        Err(RpcCallerError::NotFoundSerializer(0xD0))
    ));

    let addr = start_server(ServerOptions::default()).await;
    let options = ClientOptions {
        serializer_code: 0xD0,
        ..ClientOptions::default()
    };

    match RpcClient::connect(addr, options).await {
        Err(RpcCallerError::NotFoundSerializer(code)) => assert_eq!(code, 0xD0),
        Err(other) => panic!("expected missing serializer, got {:?}", other),
        Ok(_) => panic!("client built with an unregistered serializer"),
    }
}

#[tokio::test]
async fn test_server_with_unregistered_serializer_drops_connections() {
    let addr = start_server(ServerOptions {
        serializer_code: 0xD1,
        ..ServerOptions::default()
    })
    .await;

    let rpc_client = RpcClient::connect(addr, ClientOptions::default())
        .await
        .unwrap();

    assert!(Echo::call(&rpc_client, EchoArgs { x: 1 }).await.is_err());
}
