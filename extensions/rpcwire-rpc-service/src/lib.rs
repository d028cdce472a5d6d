mod caller_error;
pub use caller_error::RpcCallerError;
mod client_interface;
pub use client_interface::RpcClientInterface;
mod method;
pub use method::RpcMethod;
mod call;
pub use call::{RpcCall, call_method};
