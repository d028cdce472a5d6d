use rpcwire::compressor::CompressType;
use rpcwire::constants::DEFAULT_MAX_BODY_SIZE;
use rpcwire::serializer::{SerializeType, is_serializer_registered};
use rpcwire_rpc_service::RpcCallerError;

/// Per-connection settings, fixed when the client is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Compressor applied to every request body. Must be registered.
    pub compress_type: CompressType,

    /// Serializer registry code. Must match the server's.
    pub serializer_code: u8,

    /// Largest response body the client accepts before dropping the
    /// connection.
    pub max_body_len: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            compress_type: CompressType::default(),
            serializer_code: SerializeType::default().into(),
            max_body_len: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ClientOptions {
    pub fn with_compress_type(mut self, compress_type: CompressType) -> Self {
        self.compress_type = compress_type;
        self
    }

    pub fn with_serialize_type(mut self, serialize_type: SerializeType) -> Self {
        self.serializer_code = serialize_type.into();
        self
    }

    /// Selects a registered serializer by its numeric code, e.g. one read
    /// from the environment.
    pub fn with_serializer_code(mut self, code: u8) -> Result<Self, RpcCallerError> {
        if !is_serializer_registered(code) {
            return Err(RpcCallerError::NotFoundSerializer(code));
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
    fn defaults_to_raw_json() {
        let options = ClientOptions::default();
        assert_eq!(options.compress_type, CompressType::RAW);
        assert_eq!(options.serializer_code, u8::from(SerializeType::Json));
        assert_eq!(options.max_body_len, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn unknown_serializer_code_is_rejected() {
        let options = ClientOptions::default().with_serializer_code(1).unwrap();
        assert_eq!(options.serializer_code, u8::from(SerializeType::Bitcode));

        assert!(matches!(
            ClientOptions::default().with_serializer_code(200),
            Err(RpcCallerError::NotFoundSerializer(200))
        ));
    }
}
