mod compress_type;
mod compressor_registry;
mod compressor_trait;
mod gzip_compressor;
mod raw_compressor;
mod snappy_compressor;
mod zlib_compressor;

pub use compress_type::CompressType;
pub use compressor_registry::{get_compressor, is_compressor_registered, register_compressor};
pub use compressor_trait::Compressor;
pub use gzip_compressor::GzipCompressor;
pub use raw_compressor::RawCompressor;
pub use snappy_compressor::SnappyCompressor;
pub use zlib_compressor::ZlibCompressor;
