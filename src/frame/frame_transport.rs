//! Exact-count byte transfer over streams that may deliver fewer bytes than
//! requested per call.
//!
//! Header payloads are framed with a 4-byte big-endian length prefix because
//! the receiver cannot know their size up front. Bodies are moved with
//! [`read_exact`] / [`write_all`] only: their length is already carried in the
//! decoded header, so they get no prefix of their own.

use super::FrameError;
use crate::constants::FRAME_LENGTH_FIELD_SIZE;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Writes `payload` as one length-prefixed frame.
pub async fn send_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::FrameTooLarge {
        len: payload.len(),
        max: u32::MAX as usize,
    })?;

    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;

    tracing::trace!("Sent frame with {} byte payload", payload.len());

    Ok(())
}

/// Reads one length-prefixed frame and returns its payload.
///
/// Frames declaring more than `max_len` bytes are rejected before anything
/// is allocated for them.
pub async fn recv_frame<R>(reader: &mut R, max_len: usize) -> Result<Vec<u8>, FrameError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut len_bytes = [0u8; FRAME_LENGTH_FIELD_SIZE];
    read_exact(reader, &mut len_bytes).await?;

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > max_len {
        return Err(FrameError::FrameTooLarge { len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    read_exact(reader, &mut payload).await?;

    tracing::trace!("Received frame with {} byte payload", len);

    Ok(payload)
}

/// Fills `buf` completely, looping over short reads.
pub async fn read_exact<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    reader.read_exact(buf).await?;
    Ok(())
}

/// Writes all of `buf`, looping over short writes.
pub async fn write_all<W>(writer: &mut W, buf: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(buf).await?;
    Ok(())
}

/// Consumes exactly `len` bytes from the stream without keeping them.
pub async fn discard_exact<R>(reader: &mut R, len: u64) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if len == 0 {
        return Ok(());
    }

    let mut limited = (&mut *reader).take(len);
    let discarded = tokio::io::copy(&mut limited, &mut tokio::io::sink()).await?;

    if discarded < len {
        return Err(FrameError::UnexpectedEof);
    }

    Ok(())
}
