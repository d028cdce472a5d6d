use crate::ClientOptions;
use rpcwire::codec::{ClientCodec, CodecError};
use rpcwire::serializer::{AnySerializer, Serializer, get_serializer};
use rpcwire_rpc_service::{RpcCallerError, RpcClientInterface};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// What the reader task hands back to a waiting caller: the verified,
/// decompressed result bytes, or the reason there are none.
type Reply = Result<Vec<u8>, RpcCallerError>;

type WaiterTable = HashMap<u64, oneshot::Sender<Reply>>;

/// RPC client over one connection.
///
/// Calls may be issued from any number of tasks at once. A single background
/// task reads every response and completes the matching caller, so responses
/// can arrive in any order.
pub struct RpcClient<T = TcpStream> {
    shared: Arc<ClientShared<T>>,
    reader_task: JoinHandle<()>,
}

struct ClientShared<T> {
    codec: ClientCodec<T, AnySerializer>,
    next_seq: AtomicU64,
    waiters: Mutex<WaiterTable>,
    is_shutdown: AtomicBool,
}

impl RpcClient<TcpStream> {
    /// Connects to `addr` over TCP.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        options: ClientOptions,
    ) -> Result<Self, RpcCallerError> {
        let stream = TcpStream::connect(addr).await.map_err(CodecError::from)?;
        stream.set_nodelay(true).map_err(CodecError::from)?;

        tracing::debug!("Connected to {:?}", stream.peer_addr());

        Self::new(stream, options)
    }
}

impl<T> RpcClient<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Wraps an already established stream and starts the reader task.
    ///
    /// Fails if `options` names a serializer code that is not registered.
    /// Must be called from within a Tokio runtime.
    pub fn new(stream: T, options: ClientOptions) -> Result<Self, RpcCallerError> {
        let serializer = get_serializer(options.serializer_code)
            .ok_or(RpcCallerError::NotFoundSerializer(options.serializer_code))?;

        let shared = Arc::new(ClientShared {
            codec: ClientCodec::new(stream, options.compress_type, serializer)
                .with_max_body_len(options.max_body_len),
            next_seq: AtomicU64::new(0),
            waiters: Mutex::new(HashMap::new()),
            is_shutdown: AtomicBool::new(false),
        });

        let reader_task = tokio::spawn(Self::run_reader(Arc::clone(&shared)));

        Ok(Self {
            shared,
            reader_task,
        })
    }

    /// Whether calls can still be made. Turns `false` once the connection
    /// fails or [`close`](Self::close) is called, and never turns back.
    pub fn is_connected(&self) -> bool {
        !self.shared.is_shutdown.load(Ordering::SeqCst)
    }

    /// Calls `service_method` with `args` and waits for its result.
    ///
    /// The request is written from a separate task, so dropping the returned
    /// future never leaves a partial frame on the connection.
    pub async fn call<P, R>(&self, service_method: &str, args: &P) -> Result<R, RpcCallerError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if !self.is_connected() {
            return Err(RpcCallerError::Aborted);
        }

        let payload = self
            .shared
            .codec
            .serializer()
            .marshal(args)
            .map_err(CodecError::from)?;

        let seq = self.shared.next_seq.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        let _pending = PendingCall::register(&self.shared, seq, reply_tx)?;

        let write = tokio::spawn({
            let shared = Arc::clone(&self.shared);
            let service_method = service_method.to_owned();
            async move {
                shared
                    .codec
                    .write_request_payload(seq, &service_method, &payload)
                    .await
            }
        });

        match write.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err(RpcCallerError::Aborted),
        }

        let payload = reply_rx.await.map_err(|_| RpcCallerError::Aborted)??;

        let result = self
            .shared
            .codec
            .serializer()
            .unmarshal(&payload)
            .map_err(CodecError::from)?;

        Ok(result)
    }

    /// Closes the connection. Calls still waiting fail with
    /// [`RpcCallerError::Aborted`].
    pub async fn close(&self) -> Result<(), RpcCallerError> {
        self.shared.shut_down();
        self.shared.codec.close().await?;
        Ok(())
    }

    async fn run_reader(shared: Arc<ClientShared<T>>) {
        loop {
            let response = match shared.codec.read_response_header().await {
                Ok(response) => response,
                Err(CodecError::UnexpectedEof) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(err) if shared.codec.is_closed() => {
                    tracing::debug!("Reader stopped after close: {}", err);
                    break;
                }
                Err(err) => {
                    tracing::error!("Failed to read response header: {}", err);
                    break;
                }
            };

            let Some(waiter) = shared.take_waiter(response.seq) else {
                tracing::warn!(
                    "Dropping response {} for `{}`: no caller is waiting",
                    response.seq,
                    response.service_method
                );

                if let Err(err) = shared.codec.discard_response_body().await {
                    tracing::error!("Failed to skip response body: {}", err);
                    break;
                }
                continue;
            };

            match Self::read_reply(&shared.codec, response.error).await {
                Ok(reply) => {
                    // The caller may have given up already.
                    let _ = waiter.send(reply);
                }
                Err(err) => {
                    tracing::error!("Failed to read response {}: {}", response.seq, err);
                    let _ = waiter.send(Err(err.into()));
                    break;
                }
            }
        }

        shared.shut_down();
    }

    /// Reads the body of the current response. The outer error means the
    /// stream can no longer be trusted; the inner one belongs to the caller.
    async fn read_reply(
        codec: &ClientCodec<T, AnySerializer>,
        error: String,
    ) -> Result<Reply, CodecError> {
        if !error.is_empty() {
            codec.discard_response_body().await?;
            return Ok(Err(RpcCallerError::Remote(error)));
        }

        match codec.read_response_payload().await {
            Ok(payload) => Ok(Ok(payload)),
            Err(err) if !err.is_fatal() => Ok(Err(err.into())),
            Err(err) => Err(err),
        }
    }
}

impl<T> Drop for RpcClient<T> {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

#[async_trait::async_trait]
impl<T> RpcClientInterface for RpcClient<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn call_rpc<P, R>(&self, service_method: &str, args: &P) -> Result<R, RpcCallerError>
    where
        P: Serialize + Send + Sync + ?Sized,
        R: DeserializeOwned + Send + 'static,
    {
        self.call(service_method, args).await
    }
}

impl<T> ClientShared<T> {
    fn lock_waiters(&self) -> MutexGuard<'_, WaiterTable> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_waiter(&self, seq: u64) -> Option<oneshot::Sender<Reply>> {
        self.lock_waiters().remove(&seq)
    }

    /// Marks the client unusable and fails every waiting caller.
    fn shut_down(&self) {
        self.is_shutdown.store(true, Ordering::SeqCst);

        let waiters: Vec<_> = self.lock_waiters().drain().collect();
        if !waiters.is_empty() {
            tracing::debug!("Aborting {} waiting calls", waiters.len());
        }

        for (_, waiter) in waiters {
            let _ = waiter.send(Err(RpcCallerError::Aborted));
        }
    }
}

/// Waiter-table entry for one call; removed again when the call ends, by
/// whatever path.
struct PendingCall<'a, T> {
    shared: &'a ClientShared<T>,
    seq: u64,
}

impl<'a, T> PendingCall<'a, T> {
    fn register(
        shared: &'a ClientShared<T>,
        seq: u64,
        reply_tx: oneshot::Sender<Reply>,
    ) -> Result<Self, RpcCallerError> {
        shared.lock_waiters().insert(seq, reply_tx);

        let pending = PendingCall { shared, seq };

        // A shutdown that drained the table before the insert would never
        // complete this entry.
        if shared.is_shutdown.load(Ordering::SeqCst) {
            return Err(RpcCallerError::Aborted);
        }

        Ok(pending)
    }
}

impl<T> Drop for PendingCall<'_, T> {
    fn drop(&mut self) {
        self.shared.lock_waiters().remove(&self.seq);
    }
}
