mod endpoint;
pub use endpoint::{RpcHandler, RpcHandlerError, RpcHandlerFuture, RpcServiceEndpoint};
mod endpoint_interface;
pub use endpoint_interface::RpcServiceEndpointInterface;
mod error;
pub use error::RpcServiceEndpointError;
mod server_options;
pub use server_options::ServerOptions;
mod rpc_server;
pub use rpc_server::RpcServer;
pub mod utils;
