use super::body_pipeline::{
    body_len, check_body_len, compress_body, decompress_body, verify_checksum,
};
use super::close_signal::CloseSignal;
use super::{CodecError, Request};
use crate::constants::{DEFAULT_MAX_BODY_SIZE, MAX_HEADER_FRAME_SIZE, MAX_HEADER_TEXT_SIZE};
use crate::frame::{discard_exact, read_exact, recv_frame, send_frame, write_all};
use crate::header::{RESPONSE_HEADER_POOL, RequestHeader, ResetHeader};
use crate::serializer::Serializer;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{
    AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, ReadHalf, WriteHalf, split,
};
use tokio::sync::Mutex;

/// Error text sent when a handler fails without saying why, so the reply
/// can never be mistaken for a success.
const EMPTY_ERROR_PLACEHOLDER: &str = "rpc: handler returned an empty error";

/// Server side of the wire codec: reads calls and writes their responses.
///
/// Mirrors [`ClientCodec`](super::ClientCodec). One task reads requests
/// (header, then exactly one body read), while responses may be written
/// from any number of tasks; each response is written atomically with
/// respect to the others.
///
/// No per-call table is kept: every [`Request`] carries its own sequence ID
/// and compressor code through to [`write_response`](Self::write_response).
pub struct ServerCodec<T, S> {
    reader: Mutex<RequestReader<T>>,
    writer: Mutex<BufWriter<WriteHalf<T>>>,
    serializer: S,
    max_body_len: usize,
    close_signal: CloseSignal,
}

/// Buffered read half plus the single request header it decodes into.
struct RequestReader<T> {
    reader: BufReader<ReadHalf<T>>,
    request: RequestHeader,
}

impl<T, S> ServerCodec<T, S>
where
    T: AsyncRead + AsyncWrite,
    S: Serializer,
{
    pub fn new(stream: T, serializer: S) -> Self {
        let (read_half, write_half) = split(stream);

        Self {
            reader: Mutex::new(RequestReader {
                reader: BufReader::new(read_half),
                request: RequestHeader::default(),
            }),
            writer: Mutex::new(BufWriter::new(write_half)),
            serializer,
            max_body_len: DEFAULT_MAX_BODY_SIZE,
            close_signal: CloseSignal::new(),
        }
    }

    /// Caps the body length a request header may declare; see
    /// [`ClientCodec::with_max_body_len`](super::ClientCodec::with_max_body_len).
    pub fn with_max_body_len(mut self, max_body_len: usize) -> Self {
        self.max_body_len = max_body_len;
        self
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    pub fn max_body_len(&self) -> usize {
        self.max_body_len
    }

    pub fn is_closed(&self) -> bool {
        self.close_signal.is_closed()
    }

    /// Reads the next request header.
    pub async fn read_request_header(&self) -> Result<Request, CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                state.request.reset();
                let data = recv_frame(&mut state.reader, MAX_HEADER_FRAME_SIZE).await?;
                state.request.unmarshal(&data)?;

                tracing::trace!(
                    "Request header {} for `{}` ({} byte body)",
                    state.request.id,
                    state.request.method,
                    state.request.request_len
                );

                Ok(Request {
                    seq: state.request.id,
                    service_method: state.request.method.clone(),
                    compress_type: state.request.compress_type,
                })
            })
            .await
    }

    /// Reads the body announced by the last request header and decodes it.
    pub async fn read_request_body<P>(&self) -> Result<P, CodecError>
    where
        P: DeserializeOwned,
    {
        let payload = self.read_request_payload().await?;
        Ok(self.serializer.unmarshal(&payload)?)
    }

    /// Reads the body announced by the last request header, verifies it and
    /// returns the decompressed bytes without deserializing them.
    ///
    /// The caller's compressor must be registered locally; any code is
    /// accepted otherwise, since the response will reuse it.
    pub async fn read_request_payload(&self) -> Result<Vec<u8>, CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                let len = check_body_len(state.request.request_len, self.max_body_len)?;
                let mut body = vec![0u8; len];
                read_exact(&mut state.reader, &mut body).await?;

                verify_checksum(&body, state.request.checksum)?;
                decompress_body(state.request.compress_type, &body)
            })
            .await
    }

    /// Consumes and drops the body announced by the last request header.
    pub async fn discard_request_body(&self) -> Result<(), CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                discard_exact(&mut state.reader, u64::from(state.request.request_len)).await?;
                Ok(())
            })
            .await
    }

    /// Writes the reply to `request`: either a serialized result, or an
    /// error string with an empty body.
    pub async fn write_response<R>(
        &self,
        request: &Request,
        reply: Result<&R, &str>,
    ) -> Result<(), CodecError>
    where
        R: Serialize + ?Sized,
    {
        match reply {
            Ok(value) => {
                let payload = self.serializer.marshal(value)?;
                self.write_response_payload(request, Ok(payload.as_slice())).await
            }
            Err(error) => self.write_response_payload(request, Err(error)).await,
        }
    }

    /// Like [`write_response`](Self::write_response), for a result that is
    /// already serialized.
    ///
    /// The body is compressed with the compressor the request declared. An
    /// error text too long for a header frame is cut to fit.
    pub async fn write_response_payload(
        &self,
        request: &Request,
        reply: Result<&[u8], &str>,
    ) -> Result<(), CodecError> {
        let mut header = RESPONSE_HEADER_POOL.acquire();
        header.id = request.seq;
        header.compress_type = request.compress_type;

        let body = match reply {
            Ok(payload) => {
                let (compressed, checksum) = compress_body(request.compress_type, payload)?;
                header.response_len = body_len(&compressed)?;
                header.checksum = checksum;
                compressed
            }
            Err(error) => {
                let error = if error.is_empty() { EMPTY_ERROR_PLACEHOLDER } else { error };
                let fitted = truncate_to_char_boundary(error, MAX_HEADER_TEXT_SIZE);
                if fitted.len() < error.len() {
                    tracing::warn!(
                        "Truncated {} byte error for response {} to {} bytes",
                        error.len(),
                        request.seq,
                        fitted.len()
                    );
                }

                header.error.push_str(fitted);
                Vec::new()
            }
        };

        let header_bytes = header.marshal()?;

        self.close_signal
            .guard(async {
                let mut writer = self.writer.lock().await;
                send_frame(&mut *writer, &header_bytes).await?;
                write_all(&mut *writer, &body).await?;
                writer.flush().await?;
                Ok(())
            })
            .await
    }

    /// Closes the connection; see [`ClientCodec::close`](super::ClientCodec::close).
    pub async fn close(&self) -> Result<(), CodecError> {
        if !self.close_signal.close() {
            return Ok(());
        }

        tracing::debug!("Closing server codec");

        // Same as the client: never flush what an aborted write left behind.
        let mut writer = self.writer.lock().await;
        writer.get_mut().shutdown().await?;
        Ok(())
    }
}

/// Longest prefix of `text` that is at most `max` bytes and ends on a
/// character boundary.
fn truncate_to_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_char_boundary("boom", 10), "boom");
        assert_eq!(truncate_to_char_boundary("boom", 4), "boom");
    }

    #[test]
    fn truncation_never_splits_a_character() {
        // "é" is two bytes; a cut at 3 would land inside the second one.
        assert_eq!(truncate_to_char_boundary("aéé", 4), "aé");
        assert_eq!(truncate_to_char_boundary("aéé", 3), "aé");
        assert_eq!(truncate_to_char_boundary("aéé", 2), "a");
        assert_eq!(truncate_to_char_boundary("éa", 1), "");
    }
}
