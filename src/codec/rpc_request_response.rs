use crate::compressor::CompressType;

/// Decoded request header as handed to a server-side dispatch engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub seq: u64,
    pub service_method: String,

    /// Compressor the caller used; the response is compressed the same way.
    pub compress_type: CompressType,
}

/// Decoded response header as handed to a client-side dispatch engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub seq: u64,

    /// Method of the request sent under `seq`, recovered from the pending
    /// table. Empty when no request with that sequence was outstanding.
    pub service_method: String,

    /// Handler failure text. Empty means success.
    pub error: String,
}
