use std::io;

/// A reversible body transform, looked up by [`CompressType`](super::CompressType).
///
/// Implementations are shared process-wide through the registry, so they must
/// be stateless or internally synchronized.
pub trait Compressor: Send + Sync {
    /// Compresses a serialized payload.
    fn zip(&self, data: &[u8]) -> io::Result<Vec<u8>>;

    /// Reverses [`Compressor::zip`].
    fn unzip(&self, data: &[u8]) -> io::Result<Vec<u8>>;
}
