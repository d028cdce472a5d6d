//! Compress / checksum / decompress steps shared by both codec directions.

use super::CodecError;
use crate::compressor::{CompressType, get_compressor};

/// Zips `payload` with the registered compressor and checksums the result.
pub(crate) fn compress_body(
    compress_type: CompressType,
    payload: &[u8],
) -> Result<(Vec<u8>, u32), CodecError> {
    let compressor =
        get_compressor(compress_type).ok_or(CodecError::NotFoundCompressor(compress_type))?;

    let compressed = compressor.zip(payload).map_err(CodecError::Compression)?;
    let checksum = crc32fast::hash(&compressed);

    Ok((compressed, checksum))
}

pub(crate) fn decompress_body(
    compress_type: CompressType,
    body: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let compressor =
        get_compressor(compress_type).ok_or(CodecError::NotFoundCompressor(compress_type))?;

    compressor.unzip(body).map_err(CodecError::Compression)
}

/// Checks `body` against the header's checksum. A zero checksum waives the check.
pub(crate) fn verify_checksum(body: &[u8], expected: u32) -> Result<(), CodecError> {
    if expected == 0 {
        return Ok(());
    }

    let actual = crc32fast::hash(body);
    if actual != expected {
        return Err(CodecError::UnexpectedChecksum { expected, actual });
    }

    Ok(())
}

/// Length of a compressed body as carried in the header's 4-byte length field.
pub(crate) fn body_len(body: &[u8]) -> Result<u32, CodecError> {
    u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge {
        len: body.len(),
        max: u32::MAX as usize,
    })
}

/// Rejects a declared body length above `max` before anything is allocated.
pub(crate) fn check_body_len(len: u32, max: usize) -> Result<usize, CodecError> {
    let len = len as usize;
    if len > max {
        return Err(CodecError::BodyTooLarge { len, max });
    }

    Ok(len)
}
