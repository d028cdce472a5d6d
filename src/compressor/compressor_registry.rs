use super::{
    CompressType, Compressor, GzipCompressor, RawCompressor, SnappyCompressor, ZlibCompressor,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type CompressorMap = HashMap<CompressType, Arc<dyn Compressor>>;

/// Process-wide compressor table, pre-populated with the built-in codecs.
///
/// Registration is expected to happen at startup, before any codec is
/// constructed. Lookups only take the read lock.
static COMPRESSORS: Lazy<RwLock<CompressorMap>> = Lazy::new(|| {
    let mut compressors: CompressorMap = HashMap::new();
    compressors.insert(CompressType::RAW, Arc::new(RawCompressor));
    compressors.insert(CompressType::GZIP, Arc::new(GzipCompressor::default()));
    compressors.insert(CompressType::ZLIB, Arc::new(ZlibCompressor::default()));
    compressors.insert(CompressType::SNAPPY, Arc::new(SnappyCompressor));
    RwLock::new(compressors)
});

/// Registers (or replaces) the implementation for `compress_type`.
///
/// Returns the implementation previously registered under that code, if any.
pub fn register_compressor(
    compress_type: CompressType,
    compressor: Arc<dyn Compressor>,
) -> Option<Arc<dyn Compressor>> {
    tracing::debug!("Registering compressor {}", compress_type);

    COMPRESSORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(compress_type, compressor)
}

/// Looks up the implementation registered for `compress_type`.
pub fn get_compressor(compress_type: CompressType) -> Option<Arc<dyn Compressor>> {
    COMPRESSORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&compress_type)
        .cloned()
}

pub fn is_compressor_registered(compress_type: CompressType) -> bool {
    COMPRESSORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&compress_type)
}
