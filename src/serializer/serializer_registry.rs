use super::{AnySerializer, SerializeType, ValueSerializer};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type SerializerMap = HashMap<u8, AnySerializer>;

/// Process-wide serializer table keyed by code, pre-populated with the
/// built-in formats.
///
/// As with compressors, registration belongs at startup; options structs
/// resolve their code here when a client or server is built.
static SERIALIZERS: Lazy<RwLock<SerializerMap>> = Lazy::new(|| {
    let mut serializers: SerializerMap = HashMap::new();
    for serialize_type in [SerializeType::Json, SerializeType::Bitcode] {
        serializers.insert(serialize_type.into(), serialize_type.into());
    }
    RwLock::new(serializers)
});

/// Registers (or replaces) the format used for `code`.
///
/// Returns the serializer previously registered under that code, if any.
/// Replacing a built-in code swaps it out for every codec built afterwards.
pub fn register_serializer(
    code: u8,
    serializer: Arc<dyn ValueSerializer>,
) -> Option<AnySerializer> {
    tracing::debug!("Registering serializer {}", code);

    SERIALIZERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(code, AnySerializer::custom(code, serializer))
}

/// Looks up the serializer registered for `code`.
pub fn get_serializer(code: u8) -> Option<AnySerializer> {
    SERIALIZERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&code)
        .cloned()
}

pub fn is_serializer_registered(code: u8) -> bool {
    SERIALIZERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&code)
}
