use std::fmt;

/// Identifies the body compressor a peer used, as carried in every header.
///
/// This is an open set: any `u16` can appear on the wire, and only codes that
/// were registered through [`register_compressor`](crate::compressor::register_compressor)
/// resolve to an implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompressType(pub u16);

impl CompressType {
    /// Identity transform; lets callers opt out of compression.
    pub const RAW: CompressType = CompressType(0);
    pub const GZIP: CompressType = CompressType(1);
    pub const ZLIB: CompressType = CompressType(2);
    pub const SNAPPY: CompressType = CompressType(3);

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for CompressType {
    #[inline]
    fn from(value: u16) -> Self {
        CompressType(value)
    }
}

impl From<CompressType> for u16 {
    #[inline]
    fn from(value: CompressType) -> Self {
        value.0
    }
}

impl fmt::Display for CompressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CompressType::RAW => write!(f, "raw"),
            CompressType::GZIP => write!(f, "gzip"),
            CompressType::ZLIB => write!(f, "zlib"),
            CompressType::SNAPPY => write!(f, "snappy"),
            CompressType(code) => write!(f, "compressor#{}", code),
        }
    }
}
