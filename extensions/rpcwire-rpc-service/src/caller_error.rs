use rpcwire::codec::CodecError;
use std::fmt;

/// Errors a call can end with, as seen by the caller.
#[derive(Debug)]
pub enum RpcCallerError {
    /// The codec failed to write the request or to read its response.
    Codec(CodecError),

    /// The handler ran and reported an error; the string is its text.
    Remote(String),

    /// A serializer code did not resolve to a known implementation.
    NotFoundSerializer(u8),

    /// The connection went away before the response arrived.
    Aborted,
}

impl fmt::Display for RpcCallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallerError::Codec(e) => write!(f, "codec error: {}", e),
            RpcCallerError::Remote(msg) => write!(f, "remote error: {}", msg),
            RpcCallerError::NotFoundSerializer(code) => {
                write!(f, "no serializer registered for code {}", code)
            }
            RpcCallerError::Aborted => write!(f, "RPC call aborted"),
        }
    }
}

impl std::error::Error for RpcCallerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcCallerError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for RpcCallerError {
    fn from(e: CodecError) -> Self {
        RpcCallerError::Codec(e)
    }
}
