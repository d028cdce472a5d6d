use example_rpcwire_echo_app::{Add, Div, Echo, EchoArgs, register_services};
use rpcwire::compressor::CompressType;
use rpcwire_rpc_service::RpcCall;
use rpcwire_tokio_rpc_client::{ClientOptions, RpcClient};
use rpcwire_tokio_rpc_server::{RpcServer, ServerOptions};
use std::sync::Arc;
use tokio::join;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Bind to a random available port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tracing::info!("Serving example methods on {}", addr);

    {
        let server = RpcServer::new(ServerOptions::default());
        register_services(&server).await.unwrap();

        let _server_task = tokio::spawn(async move {
            let _ = Arc::new(server).serve_with_listener(listener).await;
        });
    }

    {
        // Each client picks its own compressor; the server answers in kind.
        let gzip_client = RpcClient::connect(
            addr,
            ClientOptions::default().with_compress_type(CompressType::GZIP),
        )
        .await
        .unwrap();
        let raw_client = RpcClient::connect(addr, ClientOptions::default()).await.unwrap();

        // `join!` will await all responses before proceeding
        let (res1, res2, res3, res4) = join!(
            Echo::call(&gzip_client, EchoArgs { x: 5 }),
            Add::call(&gzip_client, vec![1.0, 2.0, 3.0]),
            Div::call(&raw_client, (84, 2)),
            Div::call(&raw_client, (1, 0)),
        );

        tracing::info!("Result from echo(): {:?}", res1);
        tracing::info!("Result from add(): {:?}", res2);
        tracing::info!("Result from first div(): {:?}", res3);
        tracing::info!("Result from second div(): {:?}", res4);

        let _ = gzip_client.close().await;
        let _ = raw_client.close().await;
    }
}
