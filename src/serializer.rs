mod any_serializer;
mod bitcode_serializer;
mod json_serializer;
mod serialize_type;
mod serializer_error;
mod serializer_registry;
mod serializer_trait;

pub use any_serializer::AnySerializer;
pub use bitcode_serializer::BitcodeSerializer;
pub use json_serializer::JsonSerializer;
pub use serialize_type::SerializeType;
pub use serializer_error::SerializerError;
pub use serializer_registry::{get_serializer, is_serializer_registered, register_serializer};
pub use serializer_trait::{Serializer, ValueSerializer};
