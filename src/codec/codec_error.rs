use crate::compressor::CompressType;
use crate::frame::FrameError;
use crate::header::{HeaderDecodeError, HeaderEncodeError};
use crate::serializer::SerializerError;
use std::fmt;
use std::io;

/// Errors surfaced by [`ClientCodec`](super::ClientCodec) and
/// [`ServerCodec`](super::ServerCodec).
///
/// None of these are retried internally, and none of them close the
/// connection; that decision belongs to the caller.
#[derive(Debug)]
pub enum CodecError {
    /// No compressor is registered for the code. Raised before any bytes
    /// are written on the outbound path.
    NotFoundCompressor(CompressType),

    /// A header frame could not be decoded.
    MalformedHeader(HeaderDecodeError),

    /// The stream ended before a full frame or body was received.
    UnexpectedEof,

    /// A header frame declared a length above the accepted limit.
    FrameTooLarge { len: usize, max: usize },

    /// A header declared a body longer than this codec accepts. Nothing is
    /// read, so the stream is no longer aligned.
    BodyTooLarge { len: usize, max: usize },

    /// An outbound method name or error text does not fit in a header
    /// frame. Raised before any bytes are written.
    HeaderTooLarge { len: usize, max: usize },

    /// The CRC-32 of the received compressed body does not match the header.
    UnexpectedChecksum { expected: u32, actual: u32 },

    /// The peer compressed the body with a different compressor than this
    /// codec is configured for.
    CompressorTypeMismatch {
        expected: CompressType,
        found: CompressType,
    },

    /// The compressor failed to zip or unzip a body.
    Compression(io::Error),

    Serialization(SerializerError),

    /// Any other failure reported by the underlying stream, including
    /// operations aborted by `close`.
    Io(io::Error),
}

impl CodecError {
    /// Whether the stream may be out of alignment after this error.
    ///
    /// Checksum, compressor and serialization failures happen after the
    /// declared body was fully drained, so the next header can still be read.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedHeader(_)
                | CodecError::UnexpectedEof
                | CodecError::FrameTooLarge { .. }
                | CodecError::BodyTooLarge { .. }
                | CodecError::Io(_)
        )
    }

    pub(crate) fn closed() -> Self {
        CodecError::Io(io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "codec has been closed",
        ))
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::NotFoundCompressor(compress_type) => {
                write!(f, "no compressor registered for {}", compress_type)
            }
            CodecError::MalformedHeader(e) => write!(f, "malformed header: {}", e),
            CodecError::UnexpectedEof => write!(f, "unexpected end of stream"),
            CodecError::FrameTooLarge { len, max } => {
                write!(f, "frame of {} bytes exceeds the {} byte limit", len, max)
            }
            CodecError::BodyTooLarge { len, max } => {
                write!(f, "body of {} bytes exceeds the {} byte limit", len, max)
            }
            CodecError::HeaderTooLarge { len, max } => write!(
                f,
                "header text of {} bytes exceeds the {} byte limit",
                len, max
            ),
            CodecError::UnexpectedChecksum { expected, actual } => write!(
                f,
                "unexpected checksum: header declared {:#010x}, body hashed to {:#010x}",
                expected, actual
            ),
            CodecError::CompressorTypeMismatch { expected, found } => write!(
                f,
                "compressor type mismatch: expected {}, peer used {}",
                expected, found
            ),
            CodecError::Compression(e) => write!(f, "compression error: {}", e),
            CodecError::Serialization(e) => write!(f, "{}", e),
            CodecError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::MalformedHeader(e) => Some(e),
            CodecError::Compression(e) => Some(e),
            CodecError::Serialization(e) => Some(e),
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FrameError> for CodecError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::UnexpectedEof => CodecError::UnexpectedEof,
            FrameError::FrameTooLarge { len, max } => CodecError::FrameTooLarge { len, max },
            FrameError::Io(e) => CodecError::Io(e),
        }
    }
}

impl From<HeaderDecodeError> for CodecError {
    fn from(e: HeaderDecodeError) -> Self {
        CodecError::MalformedHeader(e)
    }
}

impl From<HeaderEncodeError> for CodecError {
    fn from(e: HeaderEncodeError) -> Self {
        match e {
            HeaderEncodeError::TextTooLong { len, max } => CodecError::HeaderTooLarge { len, max },
        }
    }
}

impl From<SerializerError> for CodecError {
    fn from(e: SerializerError) -> Self {
        CodecError::Serialization(e)
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::from(FrameError::from(e))
    }
}
