// Frame related constants
pub const FRAME_LENGTH_FIELD_SIZE: usize = 4;

/// Upper bound for a header frame's declared length.
///
/// Header frames only carry the fixed fields plus a method name or an error
/// string, so anything above this is treated as a corrupt length prefix
/// instead of being allocated.
pub const MAX_HEADER_FRAME_SIZE: usize = 1024 * 1024;

/// Size in bytes of the call sequence ID (u64).
pub const HEADER_ID_SIZE: usize = 8;

/// Size in bytes of the length prefix (u32) in front of the method / error text.
pub const HEADER_TEXT_LENGTH_SIZE: usize = 4;

/// Size in bytes of the body length field (u32).
pub const HEADER_BODY_LENGTH_SIZE: usize = 4;

/// Size in bytes of the compressor code (u16).
pub const HEADER_COMPRESS_TYPE_SIZE: usize = 2;

/// Size in bytes of the CRC-32 checksum of the compressed body (u32).
pub const HEADER_CHECKSUM_SIZE: usize = 4;

/// Total size of the fixed-width header fields, excluding the text itself.
pub const HEADER_FIXED_SIZE: usize = HEADER_ID_SIZE
    + HEADER_TEXT_LENGTH_SIZE
    + HEADER_BODY_LENGTH_SIZE
    + HEADER_COMPRESS_TYPE_SIZE
    + HEADER_CHECKSUM_SIZE; // 8 + 4 + 4 + 2 + 4 = 22

/// Longest method name or error text that still fits in a header frame.
pub const MAX_HEADER_TEXT_SIZE: usize = MAX_HEADER_FRAME_SIZE - HEADER_FIXED_SIZE;

/// Default ceiling for a body length declared by the peer. Bodies above it
/// are refused before anything is allocated for them.
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Number of idle header values each header pool keeps around for reuse.
pub const HEADER_POOL_CAPACITY: usize = 64;
