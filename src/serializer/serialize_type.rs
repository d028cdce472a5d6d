use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Codes of the built-in payload formats.
///
/// Unlike compressors, the format is not carried on the wire: both peers are
/// configured with the same one when their codecs are constructed. Further
/// codes can be added with [`register_serializer`](crate::serializer::register_serializer).
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum SerializeType {
    #[default]
    Json = 0,
    Bitcode = 1,
}
