use super::{SerializeType, Serializer, SerializerError};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn code(&self) -> u8 {
        SerializeType::Json.into()
    }

    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + ?Sized,
    {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal<T>(&self, bytes: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}
