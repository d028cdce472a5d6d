use super::Compressor;
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use std::io::{self, Read, Write};

/// Gzip body compression, registered under `CompressType::GZIP`.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl GzipCompressor {
    pub fn new(level: Compression) -> Self {
        Self { level }
    }
}

impl Compressor for GzipCompressor {
    fn zip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len()), self.level);
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn unzip(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::with_capacity(data.len() * 2);
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}
