use super::{HeaderDecodeError, HeaderEncodeError};
use crate::compressor::CompressType;
use crate::constants::{
    HEADER_BODY_LENGTH_SIZE, HEADER_CHECKSUM_SIZE, HEADER_COMPRESS_TYPE_SIZE, HEADER_FIXED_SIZE,
    HEADER_ID_SIZE, HEADER_TEXT_LENGTH_SIZE, MAX_HEADER_TEXT_SIZE,
};
use bytes::{Buf, BufMut};

/// Borrowed view of the fields shared by request and response headers.
///
/// Both headers have the same layout; only the meaning of `text` differs
/// (method name for requests, error string for responses):
///
/// ```text
/// id:u64 | text_len:u32 | text | body_len:u32 | compress_type:u16 | checksum:u32
/// ```
///
/// All integers are big-endian.
pub(super) struct HeaderFields<'a> {
    pub id: u64,
    pub text: &'a str,
    pub body_len: u32,
    pub compress_type: CompressType,
    pub checksum: u32,
}

impl<'a> HeaderFields<'a> {
    /// Fails if the text would make the frame larger than any receiver accepts.
    pub fn encode(&self) -> Result<Vec<u8>, HeaderEncodeError> {
        if self.text.len() > MAX_HEADER_TEXT_SIZE {
            return Err(HeaderEncodeError::TextTooLong {
                len: self.text.len(),
                max: MAX_HEADER_TEXT_SIZE,
            });
        }

        let mut buf = Vec::with_capacity(HEADER_FIXED_SIZE + self.text.len());
        buf.put_u64(self.id);
        buf.put_u32(self.text.len() as u32);
        buf.put_slice(self.text.as_bytes());
        buf.put_u32(self.body_len);
        buf.put_u16(self.compress_type.value());
        buf.put_u32(self.checksum);
        Ok(buf)
    }

    pub fn decode(mut buf: &'a [u8]) -> Result<Self, HeaderDecodeError> {
        ensure_remaining(buf, "id", HEADER_ID_SIZE)?;
        let id = buf.get_u64();

        ensure_remaining(buf, "text_len", HEADER_TEXT_LENGTH_SIZE)?;
        let text_len = buf.get_u32() as usize;
        if text_len > buf.remaining() {
            return Err(HeaderDecodeError::TextLengthOverflow {
                declared: text_len,
                remaining: buf.remaining(),
            });
        }
        let (text_bytes, rest) = buf.split_at(text_len);
        let text = std::str::from_utf8(text_bytes).map_err(|_| HeaderDecodeError::InvalidUtf8)?;
        buf = rest;

        ensure_remaining(buf, "body_len", HEADER_BODY_LENGTH_SIZE)?;
        let body_len = buf.get_u32();

        ensure_remaining(buf, "compress_type", HEADER_COMPRESS_TYPE_SIZE)?;
        let compress_type = CompressType(buf.get_u16());

        ensure_remaining(buf, "checksum", HEADER_CHECKSUM_SIZE)?;
        let checksum = buf.get_u32();

        if buf.has_remaining() {
            return Err(HeaderDecodeError::TrailingBytes {
                remaining: buf.remaining(),
            });
        }

        Ok(Self {
            id,
            text,
            body_len,
            compress_type,
            checksum,
        })
    }
}

#[inline]
fn ensure_remaining(
    buf: &[u8],
    field: &'static str,
    needed: usize,
) -> Result<(), HeaderDecodeError> {
    if buf.remaining() < needed {
        return Err(HeaderDecodeError::Truncated {
            field,
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}
