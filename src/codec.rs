mod body_pipeline;
mod client_codec;
mod close_signal;
mod codec_error;
mod rpc_request_response;
mod server_codec;

pub use client_codec::ClientCodec;
pub use codec_error::CodecError;
pub use rpc_request_response::{Request, Response};
pub use server_codec::ServerCodec;
