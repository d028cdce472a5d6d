use std::fmt;

/// Reasons a header frame's bytes could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderDecodeError {
    /// The buffer ended before a fixed-width field could be read.
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The text length prefix points past the end of the buffer.
    TextLengthOverflow { declared: usize, remaining: usize },

    /// The method / error text is not valid UTF-8.
    InvalidUtf8,

    /// Bytes were left over after the checksum field.
    TrailingBytes { remaining: usize },
}

impl fmt::Display for HeaderDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderDecodeError::Truncated {
                field,
                needed,
                remaining,
            } => write!(
                f,
                "header truncated at `{}`: needed {} bytes, {} remaining",
                field, needed, remaining
            ),
            HeaderDecodeError::TextLengthOverflow {
                declared,
                remaining,
            } => write!(
                f,
                "header text length {} exceeds the {} remaining bytes",
                declared, remaining
            ),
            HeaderDecodeError::InvalidUtf8 => write!(f, "header text is not valid UTF-8"),
            HeaderDecodeError::TrailingBytes { remaining } => {
                write!(f, "{} unexpected trailing bytes after header", remaining)
            }
        }
    }
}

impl std::error::Error for HeaderDecodeError {}

/// Reasons a header could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEncodeError {
    /// The method / error text would push the header frame past
    /// [`MAX_HEADER_FRAME_SIZE`](crate::constants::MAX_HEADER_FRAME_SIZE),
    /// which every receiver rejects.
    TextTooLong { len: usize, max: usize },
}

impl fmt::Display for HeaderEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderEncodeError::TextTooLong { len, max } => write!(
                f,
                "header text of {} bytes exceeds the {} byte limit",
                len, max
            ),
        }
    }
}

impl std::error::Error for HeaderEncodeError {}
