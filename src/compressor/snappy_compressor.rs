use super::Compressor;
use snap::raw::{Decoder, Encoder};
use std::io;

/// Snappy block compression, registered under `CompressType::SNAPPY`.
///
/// Uses the raw block format (no stream framing): each body is one block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyCompressor;

impl Compressor for SnappyCompressor {
    fn zip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        Encoder::new()
            .compress_vec(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn unzip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        Decoder::new()
            .decompress_vec(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetitive_input_shrinks() {
        let data = b"abcdabcdabcd".repeat(256);
        let zipped = SnappyCompressor.zip(&data).unwrap();
        assert!(zipped.len() < data.len());
        assert_eq!(SnappyCompressor.unzip(&zipped).unwrap(), data);
    }

    #[test]
    fn garbage_is_invalid_data() {
        let err = SnappyCompressor.unzip(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
