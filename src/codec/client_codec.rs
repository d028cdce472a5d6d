use super::body_pipeline::{
    body_len, check_body_len, compress_body, decompress_body, verify_checksum,
};
use super::close_signal::CloseSignal;
use super::{CodecError, Response};
use crate::compressor::{CompressType, get_compressor};
use crate::constants::{DEFAULT_MAX_BODY_SIZE, MAX_HEADER_FRAME_SIZE};
use crate::frame::{discard_exact, read_exact, recv_frame, send_frame, write_all};
use crate::header::{REQUEST_HEADER_POOL, ResetHeader, ResponseHeader};
use crate::serializer::Serializer;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::io::{
    AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, ReadHalf, WriteHalf, split,
};
use tokio::sync::Mutex;

/// Client side of the wire codec: writes calls and reads their responses.
///
/// One codec serves one connection. Any number of tasks may call
/// [`write_request`](Self::write_request) concurrently; exactly one task is
/// expected to drive the read side, calling
/// [`read_response_header`](Self::read_response_header) followed by one of
/// the body readers for that same response, in strict alternation.
///
/// The pending-call table (sequence ID to method name) is the only state the
/// writer and reader roles share. Its lock is never held across I/O.
pub struct ClientCodec<T, S> {
    reader: Mutex<ResponseReader<T>>,
    writer: Mutex<BufWriter<WriteHalf<T>>>,
    compress_type: CompressType,
    serializer: S,
    max_body_len: usize,
    pending: StdMutex<HashMap<u64, String>>,
    close_signal: CloseSignal,
}

/// Buffered read half plus the single response header it decodes into.
struct ResponseReader<T> {
    reader: BufReader<ReadHalf<T>>,
    response: ResponseHeader,
}

impl<T, S> ClientCodec<T, S>
where
    T: AsyncRead + AsyncWrite,
    S: Serializer,
{
    /// Wraps `stream`, bound to one compressor code and one serializer for
    /// the codec's whole lifetime.
    ///
    /// The compressor is resolved per call, so an unregistered code surfaces
    /// as [`CodecError::NotFoundCompressor`] from `write_request`.
    pub fn new(stream: T, compress_type: CompressType, serializer: S) -> Self {
        let (read_half, write_half) = split(stream);

        Self {
            reader: Mutex::new(ResponseReader {
                reader: BufReader::new(read_half),
                response: ResponseHeader::default(),
            }),
            writer: Mutex::new(BufWriter::new(write_half)),
            compress_type,
            serializer,
            max_body_len: DEFAULT_MAX_BODY_SIZE,
            pending: StdMutex::new(HashMap::new()),
            close_signal: CloseSignal::new(),
        }
    }

    /// Caps the body length a response header may declare. Larger bodies
    /// fail with [`CodecError::BodyTooLarge`] before anything is allocated.
    pub fn with_max_body_len(mut self, max_body_len: usize) -> Self {
        self.max_body_len = max_body_len;
        self
    }

    pub fn compress_type(&self) -> CompressType {
        self.compress_type
    }

    pub fn max_body_len(&self) -> usize {
        self.max_body_len
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Number of calls written whose response header has not been read yet.
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn is_closed(&self) -> bool {
        self.close_signal.is_closed()
    }

    /// Serializes, compresses and checksums `param`, then writes the request
    /// header frame followed by the compressed body.
    ///
    /// `seq` must not be reused while a previous call with the same value is
    /// still outstanding. If the call fails, its pending entry is removed again.
    pub async fn write_request<P>(
        &self,
        seq: u64,
        service_method: &str,
        param: &P,
    ) -> Result<(), CodecError>
    where
        P: Serialize + ?Sized,
    {
        let payload = self.serializer.marshal(param)?;
        self.write_request_payload(seq, service_method, &payload).await
    }

    /// Like [`write_request`](Self::write_request), for arguments that are
    /// already serialized.
    pub async fn write_request_payload(
        &self,
        seq: u64,
        service_method: &str,
        payload: &[u8],
    ) -> Result<(), CodecError> {
        self.lock_pending().insert(seq, service_method.to_owned());

        let result = self.send_request(seq, service_method, payload).await;

        if let Err(err) = &result {
            tracing::debug!("Request {} ({}) failed: {}", seq, service_method, err);
            self.lock_pending().remove(&seq);
        }

        result
    }

    async fn send_request(
        &self,
        seq: u64,
        service_method: &str,
        payload: &[u8],
    ) -> Result<(), CodecError> {
        // Checked up front so an unknown code never reaches the stream.
        if get_compressor(self.compress_type).is_none() {
            return Err(CodecError::NotFoundCompressor(self.compress_type));
        }

        let (compressed, checksum) = compress_body(self.compress_type, payload)?;

        let mut header = REQUEST_HEADER_POOL.acquire();
        header.id = seq;
        header.method.push_str(service_method);
        header.request_len = body_len(&compressed)?;
        header.compress_type = self.compress_type;
        header.checksum = checksum;

        let header_bytes = header.marshal()?;

        self.close_signal
            .guard(async {
                let mut writer = self.writer.lock().await;
                send_frame(&mut *writer, &header_bytes).await?;
                write_all(&mut *writer, &compressed).await?;
                writer.flush().await?;
                Ok(())
            })
            .await
    }

    /// Reads the next response header and resolves the method it answers.
    ///
    /// The matching pending entry is removed. A response whose sequence ID
    /// has no pending entry (duplicate or desynchronized) resolves to an
    /// empty method name rather than an error.
    pub async fn read_response_header(&self) -> Result<Response, CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                state.response.reset();
                let data = recv_frame(&mut state.reader, MAX_HEADER_FRAME_SIZE).await?;
                state.response.unmarshal(&data)?;

                let service_method = self.lock_pending().remove(&state.response.id);
                if service_method.is_none() {
                    tracing::debug!(
                        "Response header for sequence {} matches no pending request",
                        state.response.id
                    );
                }

                Ok(Response {
                    seq: state.response.id,
                    service_method: service_method.unwrap_or_default(),
                    error: state.response.error.clone(),
                })
            })
            .await
    }

    /// Reads the body announced by the last response header and decodes it.
    pub async fn read_response_body<R>(&self) -> Result<R, CodecError>
    where
        R: DeserializeOwned,
    {
        let payload = self.read_response_payload().await?;
        Ok(self.serializer.unmarshal(&payload)?)
    }

    /// Reads the body announced by the last response header, verifies it and
    /// returns the decompressed bytes without deserializing them.
    ///
    /// The whole declared length is consumed before any check runs, so a
    /// checksum or compressor mismatch leaves the stream aligned on the next
    /// header.
    pub async fn read_response_payload(&self) -> Result<Vec<u8>, CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                let len = check_body_len(state.response.response_len, self.max_body_len)?;
                let mut body = vec![0u8; len];
                read_exact(&mut state.reader, &mut body).await?;

                verify_checksum(&body, state.response.checksum)?;

                if state.response.compress_type != self.compress_type {
                    return Err(CodecError::CompressorTypeMismatch {
                        expected: self.compress_type,
                        found: state.response.compress_type,
                    });
                }

                decompress_body(state.response.compress_type, &body)
            })
            .await
    }

    /// Consumes and drops the body announced by the last response header.
    ///
    /// Used when the caller wants no result (or the call failed), so that
    /// the stream stays positioned on the next header frame.
    pub async fn discard_response_body(&self) -> Result<(), CodecError> {
        self.close_signal
            .guard(async {
                let mut guard = self.reader.lock().await;
                let state = &mut *guard;

                discard_exact(&mut state.reader, u64::from(state.response.response_len)).await?;
                Ok(())
            })
            .await
    }

    /// Closes the connection.
    ///
    /// Reads and writes in flight on other tasks fail with an I/O error of
    /// kind `ConnectionAborted`. Closing an already closed codec is a no-op.
    pub async fn close(&self) -> Result<(), CodecError> {
        if !self.close_signal.close() {
            return Ok(());
        }

        tracing::debug!("Closing client codec");

        // Bytes left buffered by an aborted write are dropped, not flushed:
        // a peer that stopped reading would block the flush forever.
        let mut writer = self.writer.lock().await;
        writer.get_mut().shutdown().await?;
        Ok(())
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<u64, String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
