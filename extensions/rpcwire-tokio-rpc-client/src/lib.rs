mod client_options;
pub use client_options::ClientOptions;
mod rpc_client;
pub use rpc_client::RpcClient;
