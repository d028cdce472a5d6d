use rpcwire::codec::CodecError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum RpcServiceEndpointError {
    /// A handler is already registered under this method name.
    DuplicateMethod(String),

    Codec(CodecError),

    /// A serializer code did not resolve to a registered implementation.
    NotFoundSerializer(u8),

    /// Binding or inspecting the listener failed.
    Io(io::Error),
}

impl fmt::Display for RpcServiceEndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcServiceEndpointError::DuplicateMethod(name) => {
                write!(f, "a handler for method `{}` is already registered", name)
            }
            RpcServiceEndpointError::Codec(e) => write!(f, "codec error: {}", e),
            RpcServiceEndpointError::NotFoundSerializer(code) => {
                write!(f, "no serializer registered for code {}", code)
            }
            RpcServiceEndpointError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RpcServiceEndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcServiceEndpointError::Codec(e) => Some(e),
            RpcServiceEndpointError::Io(e) => Some(e),
            RpcServiceEndpointError::DuplicateMethod(_)
            | RpcServiceEndpointError::NotFoundSerializer(_) => None,
        }
    }
}

impl From<CodecError> for RpcServiceEndpointError {
    fn from(e: CodecError) -> Self {
        RpcServiceEndpointError::Codec(e)
    }
}

impl From<io::Error> for RpcServiceEndpointError {
    fn from(e: io::Error) -> Self {
        RpcServiceEndpointError::Io(e)
    }
}
