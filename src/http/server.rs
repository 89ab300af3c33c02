//! Accept loop and per-connection serving.
//!
//! # Responsibilities
//! - Run the accept loop without ever blocking on request processing
//! - Spawn one task per accepted connection
//! - Perform the TLS handshake inside the connection task
//! - Drive HTTP/1.1 on the decrypted stream (keep-alive, pipelining,
//!   bounded header buffer)
//! - Drain in-flight connections on shutdown, bounded by a timeout

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, info, warn};

use crate::config::schema::ServerConfig;
use crate::error::StartupError;
use crate::http::handler;
use crate::net::connection::{ConnectionGuard, ConnectionTracker};
use crate::net::listener::{ConnectionPermit, Listener};

/// The HTTPS static file server.
///
/// Owns the accept loop. Each accepted connection is handed to its own
/// task; the TLS context and configuration are shared read-only via `Arc`,
/// so connection tasks never coordinate with each other.
pub struct HttpServer {
    config: Arc<ServerConfig>,
    tracker: ConnectionTracker,
}

impl HttpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            tracker: ConnectionTracker::new(),
        }
    }

    /// Accept connections until `shutdown` fires, then drain.
    ///
    /// The receiver resolving with an error (coordinator dropped) is
    /// treated the same as an explicit trigger.
    pub async fn run(
        self,
        listener: Listener,
        acceptor: TlsAcceptor,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let addr = listener.local_addr().map_err(StartupError::BindFailure)?;
        info!(address = %addr, "HTTPS server accepting connections");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer, permit)) => {
                            let acceptor = acceptor.clone();
                            let config = self.config.clone();
                            let guard = self.tracker.track();
                            tokio::spawn(async move {
                                serve_connection(stream, peer, acceptor, config, permit, guard).await;
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        // Closing the listener frees the port while connections drain.
        drop(listener);

        let timeout = Duration::from_secs(self.config.shutdown.drain_timeout_secs);
        let remaining = self.tracker.drain(timeout).await;
        if remaining > 0 {
            warn!(connections = remaining, "drain deadline passed, abandoning connections");
        }
        info!("server stopped");
        Ok(())
    }
}

/// Serve one accepted connection: TLS handshake first, then HTTP/1.1 until
/// the peer closes or keep-alive ends.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    acceptor: TlsAcceptor,
    config: Arc<ServerConfig>,
    _permit: ConnectionPermit,
    guard: ConnectionGuard,
) {
    let id = guard.id();

    let tls_stream = match acceptor.accept(stream).await {
        Ok(tls_stream) => tls_stream,
        Err(e) => {
            debug!(connection_id = %id, peer = %peer, error = %e, "TLS handshake failed");
            return;
        }
    };

    let service_config = config.clone();
    let service = service_fn(move |req| {
        let config = service_config.clone();
        async move { Ok::<_, Infallible>(handler::handle(req, config).await) }
    });

    let result = http1::Builder::new()
        .keep_alive(true)
        .max_buf_size(config.limits.max_header_bytes)
        .serve_connection(TokioIo::new(tls_stream), service)
        .await;

    if let Err(e) = result {
        debug!(connection_id = %id, peer = %peer, error = %e, "connection ended with error");
    }
}
