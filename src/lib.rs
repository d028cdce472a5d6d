pub mod codec;
pub mod compressor;
pub mod constants;
pub mod frame;
pub mod header;
pub mod serializer;
