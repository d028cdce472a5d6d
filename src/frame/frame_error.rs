use std::fmt;
use std::io;

#[derive(Debug)]
pub enum FrameError {
    /// The stream ended before a full frame or body was received.
    UnexpectedEof,

    /// A frame's length prefix exceeds the receiver's limit, or a payload is
    /// too large to be described by a 4-byte length.
    FrameTooLarge { len: usize, max: usize },

    /// Any other failure reported by the underlying stream.
    Io(io::Error),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnexpectedEof => write!(f, "unexpected end of stream"),
            FrameError::FrameTooLarge { len, max } => {
                write!(f, "frame of {} bytes exceeds the {} byte limit", len, max)
            }
            FrameError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => FrameError::UnexpectedEof,
            _ => FrameError::Io(e),
        }
    }
}
