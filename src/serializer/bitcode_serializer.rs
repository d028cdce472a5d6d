use super::{SerializeType, Serializer, SerializerError};
use serde::{Serialize, de::DeserializeOwned};

/// Compact binary format backed by `bitcode`'s serde mode.
///
/// Not self-describing: both peers must agree on the exact value types.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitcodeSerializer;

impl Serializer for BitcodeSerializer {
    fn code(&self) -> u8 {
        SerializeType::Bitcode.into()
    }

    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + ?Sized,
    {
        Ok(bitcode::serialize(value)?)
    }

    fn unmarshal<T>(&self, bytes: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned,
    {
        Ok(bitcode::deserialize(bytes)?)
    }
}
