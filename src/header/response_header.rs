use super::{HeaderDecodeError, HeaderEncodeError, ResetHeader, header_fields::HeaderFields};
use crate::compressor::CompressType;

/// Metadata written in front of every response body.
///
/// The response carries no method name; the client recovers it from the
/// request it sent under the same `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Equals the `id` of the request being answered.
    pub id: u64,

    /// Handler failure text. Empty means success.
    pub error: String,

    /// Length of the *compressed* body that follows the header frame.
    pub response_len: u32,

    pub compress_type: CompressType,

    /// CRC-32/IEEE of the compressed body. Zero waives the integrity check.
    pub checksum: u32,
}

impl ResponseHeader {
    pub fn marshal(&self) -> Result<Vec<u8>, HeaderEncodeError> {
        HeaderFields {
            id: self.id,
            text: &self.error,
            body_len: self.response_len,
            compress_type: self.compress_type,
            checksum: self.checksum,
        }
        .encode()
    }

    /// Decodes `data` into this header, reusing the error string's allocation.
    ///
    /// On error the header is left untouched.
    pub fn unmarshal(&mut self, data: &[u8]) -> Result<(), HeaderDecodeError> {
        let fields = HeaderFields::decode(data)?;

        self.id = fields.id;
        self.error.clear();
        self.error.push_str(fields.text);
        self.response_len = fields.body_len;
        self.compress_type = fields.compress_type;
        self.checksum = fields.checksum;

        Ok(())
    }
}

impl ResetHeader for ResponseHeader {
    fn reset(&mut self) {
        self.id = 0;
        self.error.clear();
        self.response_len = 0;
        self.compress_type = CompressType::default();
        self.checksum = 0;
    }
}
