use super::SerializerError;
use serde::{Serialize, de::DeserializeOwned};

/// Converts call arguments and results to and from bytes.
///
/// A codec is bound to exactly one serializer for its whole lifetime; it is
/// never re-negotiated per call.
pub trait Serializer: Clone + Send + Sync + 'static {
    /// Code this format is registered under; see
    /// [`register_serializer`](crate::serializer::register_serializer).
    fn code(&self) -> u8;

    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + ?Sized;

    fn unmarshal<T>(&self, bytes: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned;
}

/// Object-safe payload format that can be registered at runtime.
///
/// Values cross this boundary as [`serde_json::Value`], so the format has to
/// be self-describing (JSON, MessagePack, CBOR and the like).
pub trait ValueSerializer: Send + Sync {
    fn marshal_value(&self, value: &serde_json::Value) -> Result<Vec<u8>, SerializerError>;

    fn unmarshal_value(&self, bytes: &[u8]) -> Result<serde_json::Value, SerializerError>;
}
