//! Note: This `RpcServer` does not authenticate or authorize its peers. It is
//! meant for trusted, internal networks. Anything holding an
//! [`RpcServiceEndpoint`] can serve requests; this is one way to do it over TCP.

use crate::{
    RpcHandler, RpcServiceEndpoint, RpcServiceEndpointError, RpcServiceEndpointInterface,
    ServerOptions,
};
use rpcwire::codec::{CodecError, Request, ServerCodec};
use rpcwire::serializer::{AnySerializer, get_serializer};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, ToSocketAddrs};

/// Pause after a failed `accept`, so a persistent failure (such as running
/// out of file descriptors) does not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

type Connection<T> = Arc<ServerCodec<T, AnySerializer>>;

/// An RPC server that accepts TCP connections and dispatches their calls to
/// the handlers registered on its endpoint.
pub struct RpcServer {
    endpoint: Arc<RpcServiceEndpoint>,
    options: ServerOptions,
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new(ServerOptions::default())
    }
}

impl RpcServer {
    pub fn new(options: ServerOptions) -> Self {
        RpcServer {
            endpoint: Arc::new(RpcServiceEndpoint::new()),
            options,
        }
    }

    /// Returns an `Arc` clone of the underlying method registry, so handlers
    /// can be registered without holding on to the server itself.
    pub fn endpoint(&self) -> Arc<RpcServiceEndpoint> {
        self.endpoint.clone()
    }

    pub fn options(&self) -> ServerOptions {
        self.options
    }

    /// Binds to `addr` and serves until the process exits.
    pub async fn serve<A: ToSocketAddrs>(self, addr: A) -> Result<(), RpcServiceEndpointError> {
        let listener = TcpListener::bind(addr).await?;
        Arc::new(self).serve_with_listener(listener).await
    }

    /// Starts the server on `host:port`. The host may be a name or an address.
    pub async fn serve_on(self, host: &str, port: u16) -> Result<(), RpcServiceEndpointError> {
        self.serve(format!("{host}:{port}")).await
    }

    /// Serves connections from a pre-bound listener.
    ///
    /// Useful with port 0, where the caller needs the assigned address first.
    /// Failed `accept` calls are logged and skipped; only failing to inspect
    /// the listener ends the loop.
    pub async fn serve_with_listener(
        self: Arc<Self>,
        listener: TcpListener,
    ) -> Result<(), RpcServiceEndpointError> {
        let address = listener.local_addr()?;
        tracing::info!("Server running on {:?}", address);

        loop {
            let (stream, addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!("Failed to accept connection: {}", err);
                    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    continue;
                }
            };

            if let Err(err) = stream.set_nodelay(true) {
                tracing::debug!("Could not disable Nagle for {}: {}", addr, err);
            }

            tracing::info!("Client connected: {}", addr);

            let server = Arc::clone(&self);
            tokio::spawn(async move {
                server.serve_connection(stream, &addr.to_string()).await;
            });
        }
    }

    /// Serves calls arriving on one established stream until it ends.
    ///
    /// Requests are read in order; each handler runs in its own task and
    /// writes its response whenever it finishes, so a slow call never holds
    /// up the ones behind it.
    pub async fn serve_connection<T>(&self, stream: T, peer: &str)
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let Some(serializer) = get_serializer(self.options.serializer_code) else {
            tracing::error!(
                "Dropping connection to {}: no serializer registered for code {}",
                peer,
                self.options.serializer_code
            );
            return;
        };

        let codec: Connection<T> = Arc::new(
            ServerCodec::new(stream, serializer).with_max_body_len(self.options.max_body_len),
        );

        loop {
            let request = match codec.read_request_header().await {
                Ok(request) => request,
                Err(CodecError::UnexpectedEof) => {
                    tracing::info!("Client {} disconnected.", peer);
                    break;
                }
                Err(err) => {
                    tracing::error!("Closing connection to {}: {}", peer, err);
                    break;
                }
            };

            tracing::trace!(
                "Request {} for `{}` from {}",
                request.seq,
                request.service_method,
                peer
            );

            let Some(handler) = self.endpoint.handler(&request.service_method).await else {
                let message = format!("rpc: can't find method {}", request.service_method);
                tracing::warn!("{} (requested by {})", message, peer);

                if let Err(err) = Self::reject(&codec, &request, &message, true).await {
                    tracing::error!("Closing connection to {}: {}", peer, err);
                    break;
                }
                continue;
            };

            let payload = match codec.read_request_payload().await {
                Ok(payload) => payload,
                Err(err) if !err.is_fatal() => {
                    tracing::warn!("Rejecting request {} from {}: {}", request.seq, peer, err);

                    if let Err(err) = Self::reject(&codec, &request, &err.to_string(), false).await {
                        tracing::error!("Closing connection to {}: {}", peer, err);
                        break;
                    }
                    continue;
                }
                Err(err) => {
                    tracing::error!("Closing connection to {}: {}", peer, err);
                    break;
                }
            };

            tokio::spawn(Self::dispatch(
                Arc::clone(&codec),
                handler,
                request,
                payload,
            ));
        }

        if let Err(err) = codec.close().await {
            tracing::debug!("Error while closing connection to {}: {}", peer, err);
        }

        tracing::info!("Terminated connection for {}.", peer);
    }

    /// Answers `request` with an error, first skipping its body if it has
    /// not been consumed yet.
    async fn reject<T>(
        codec: &Connection<T>,
        request: &Request,
        message: &str,
        discard_body: bool,
    ) -> Result<(), CodecError>
    where
        T: AsyncRead + AsyncWrite,
    {
        if discard_body {
            codec.discard_request_body().await?;
        }

        codec.write_response_payload(request, Err(message)).await
    }

    /// Runs one handler and writes its response.
    async fn dispatch<T>(
        codec: Connection<T>,
        handler: RpcHandler,
        request: Request,
        payload: Vec<u8>,
    ) where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let serializer = codec.serializer().clone();

        // Spawned separately so a panicking handler still gets a reply.
        let reply = match tokio::spawn(handler(serializer, payload)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "rpc: handler for {} panicked",
                request.service_method
            )),
        };

        let written = match &reply {
            Ok(bytes) => codec.write_response_payload(&request, Ok(bytes.as_slice())).await,
            Err(message) => codec.write_response_payload(&request, Err(message.as_str())).await,
        };

        if let Err(err) = written {
            tracing::warn!(
                "Failed to write response {} for `{}`: {}",
                request.seq,
                request.service_method,
                err
            );
        }
    }
}

impl RpcServiceEndpointInterface for RpcServer {
    fn service_endpoint(&self) -> &RpcServiceEndpoint {
        &self.endpoint
    }
}
