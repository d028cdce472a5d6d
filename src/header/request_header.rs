use super::{HeaderDecodeError, HeaderEncodeError, ResetHeader, header_fields::HeaderFields};
use crate::compressor::CompressType;

/// Metadata written in front of every call body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeader {
    /// Call sequence number, unique among the calls outstanding on a connection.
    pub id: u64,

    /// Name of the target handler, e.g. `"Svc.Echo"`.
    pub method: String,

    /// Length of the *compressed* body that follows the header frame.
    pub request_len: u32,

    pub compress_type: CompressType,

    /// CRC-32/IEEE of the compressed body. Zero waives the integrity check.
    pub checksum: u32,
}

impl RequestHeader {
    pub fn marshal(&self) -> Result<Vec<u8>, HeaderEncodeError> {
        HeaderFields {
            id: self.id,
            text: &self.method,
            body_len: self.request_len,
            compress_type: self.compress_type,
            checksum: self.checksum,
        }
        .encode()
    }

    /// Decodes `data` into this header, reusing the method string's allocation.
    ///
    /// On error the header is left untouched.
    pub fn unmarshal(&mut self, data: &[u8]) -> Result<(), HeaderDecodeError> {
        let fields = HeaderFields::decode(data)?;

        self.id = fields.id;
        self.method.clear();
        self.method.push_str(fields.text);
        self.request_len = fields.body_len;
        self.compress_type = fields.compress_type;
        self.checksum = fields.checksum;

        Ok(())
    }
}

impl ResetHeader for RequestHeader {
    fn reset(&mut self) {
        self.id = 0;
        self.method.clear();
        self.request_len = 0;
        self.compress_type = CompressType::default();
        self.checksum = 0;
    }
}
