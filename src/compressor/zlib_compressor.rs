use super::Compressor;
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use std::io::{self, Read, Write};

/// Zlib body compression, registered under `CompressType::ZLIB`.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: Compression,
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl ZlibCompressor {
    pub fn new(level: Compression) -> Self {
        Self { level }
    }
}

impl Compressor for ZlibCompressor {
    fn zip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), self.level);
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn unzip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::with_capacity(data.len() * 2);
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}
