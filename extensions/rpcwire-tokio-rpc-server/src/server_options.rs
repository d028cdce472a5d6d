use crate::RpcServiceEndpointError;
use rpcwire::constants::DEFAULT_MAX_BODY_SIZE;
use rpcwire::serializer::{SerializeType, is_serializer_registered};

/// Settings applied to every connection the server accepts.
///
/// There is no compressor setting: each response is compressed the way its
/// request was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    /// Serializer registry code, resolved once per accepted connection.
    pub serializer_code: u8,

    /// Largest request body accepted before the connection is dropped.
    pub max_body_len: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            serializer_code: SerializeType::default().into(),
            max_body_len: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ServerOptions {
    pub fn with_serialize_type(mut self, serialize_type: SerializeType) -> Self {
        self.serializer_code = serialize_type.into();
        self
    }

    /// Selects a registered serializer by its numeric code.
    pub fn with_serializer_code(mut self, code: u8) -> Result<Self, RpcServiceEndpointError> {
        if !is_serializer_registered(code) {
            return Err(RpcServiceEndpointError::NotFoundSerializer(code));
        }

        self.serializer_code = code;
        Ok(self)
    }

    pub fn with_max_body_len(mut self, max_body_len: usize) -> Self {
        self.max_body_len = max_body_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_codes_are_accepted() {
        let options = ServerOptions::default().with_serializer_code(1).unwrap();
        assert_eq!(options.serializer_code, u8::from(SerializeType::Bitcode));
        assert_eq!(options.max_body_len, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn unregistered_code_is_rejected() {
        assert!(matches!(
            ServerOptions::default().with_serializer_code(250),
            Err(RpcServiceEndpointError::NotFoundSerializer(250))
        ));
    }
}
