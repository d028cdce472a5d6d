use super::{
    BitcodeSerializer, JsonSerializer, SerializeType, Serializer, SerializerError, ValueSerializer,
};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::sync::Arc;

/// Runtime selection of a serializer by code.
///
/// This is what options structs resolve to, so a format picked from
/// configuration can still be handed to the generic codecs. Built-in formats
/// dispatch statically; registered ones go through [`ValueSerializer`].
#[derive(Clone)]
pub enum AnySerializer {
    Json(JsonSerializer),
    Bitcode(BitcodeSerializer),
    Custom {
        code: u8,
        inner: Arc<dyn ValueSerializer>,
    },
}

impl AnySerializer {
    pub fn custom(code: u8, inner: Arc<dyn ValueSerializer>) -> Self {
        AnySerializer::Custom { code, inner }
    }
}

impl fmt::Debug for AnySerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnySerializer::Json(_) => f.write_str("Json"),
            AnySerializer::Bitcode(_) => f.write_str("Bitcode"),
            AnySerializer::Custom { code, .. } => {
                f.debug_struct("Custom").field("code", code).finish_non_exhaustive()
            }
        }
    }
}

impl Default for AnySerializer {
    fn default() -> Self {
        SerializeType::default().into()
    }
}

impl From<SerializeType> for AnySerializer {
    fn from(serialize_type: SerializeType) -> Self {
        match serialize_type {
            SerializeType::Json => AnySerializer::Json(JsonSerializer),
            SerializeType::Bitcode => AnySerializer::Bitcode(BitcodeSerializer),
        }
    }
}

impl Serializer for AnySerializer {
    fn code(&self) -> u8 {
        match self {
            AnySerializer::Json(s) => s.code(),
            AnySerializer::Bitcode(s) => s.code(),
            AnySerializer::Custom { code, .. } => *code,
        }
    }

    fn marshal<T>(&self, value: &T) -> Result<Vec<u8>, SerializerError>
    where
        T: Serialize + ?Sized,
    {
        match self {
            AnySerializer::Json(s) => s.marshal(value),
            AnySerializer::Bitcode(s) => s.marshal(value),
            AnySerializer::Custom { inner, .. } => {
                inner.marshal_value(&serde_json::to_value(value)?)
            }
        }
    }

    fn unmarshal<T>(&self, bytes: &[u8]) -> Result<T, SerializerError>
    where
        T: DeserializeOwned,
    {
        match self {
            AnySerializer::Json(s) => s.unmarshal(bytes),
            AnySerializer::Bitcode(s) => s.unmarshal(bytes),
            AnySerializer::Custom { inner, .. } => {
                Ok(serde_json::from_value(inner.unmarshal_value(bytes)?)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    /// Reverses the JSON text; enough to tell it apart from plain JSON.
    struct ReversedJson;

    impl ValueSerializer for ReversedJson {
        fn marshal_value(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
            let mut bytes = serde_json::to_vec(value)?;
            bytes.reverse();
            Ok(bytes)
        }

        fn unmarshal_value(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
            let mut bytes = bytes.to_vec();
            bytes.reverse();
            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    #[test]
    fn resolves_each_type_to_matching_implementation() {
        for serialize_type in [SerializeType::Json, SerializeType::Bitcode] {
            let serializer = AnySerializer::from(serialize_type);
            assert_eq!(serializer.code(), u8::from(serialize_type));
        }
    }

    #[test]
    fn unknown_code_does_not_resolve() {
        assert!(SerializeType::try_from(9u8).is_err());
        assert_eq!(SerializeType::try_from(1u8).ok(), Some(SerializeType::Bitcode));
    }

    #[test]
    fn custom_format_goes_through_its_value_serializer() {
        let serializer = AnySerializer::custom(42, Arc::new(ReversedJson));
        assert_eq!(serializer.code(), 42);

        let bytes = serializer.marshal(&json!({ "x": 1 })).unwrap();
        assert_eq!(bytes, b"}1:\"x\"{");

        let value: Value = serializer.unmarshal(&bytes).unwrap();
        assert_eq!(value, json!({ "x": 1 }));
    }

    #[test]
    fn custom_format_reports_decode_failures() {
        let serializer = AnySerializer::custom(42, Arc::new(ReversedJson));
        let err = serializer.unmarshal::<u32>(b"{}").unwrap_err();
        assert!(matches!(err, SerializerError::Json(_)));
    }
}
