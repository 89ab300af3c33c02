//! TCP listener with connection-limit backpressure.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::config::schema::{LimitsConfig, ListenerConfig};
use crate::error::StartupError;

/// A bounded TCP listener.
///
/// A semaphore enforces the configured connection limit: `accept` waits for
/// a free slot before pulling the next connection off the queue, and the
/// slot is released when the connection task drops its permit.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(listener: &ListenerConfig, limits: &LimitsConfig) -> Result<Self, StartupError> {
        let addr: SocketAddr = listener.bind_address.parse().map_err(|e| {
            StartupError::BindFailure(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {}: {}", listener.bind_address, e),
            ))
        })?;

        let inner = TcpListener::bind(addr).await.map_err(StartupError::BindFailure)?;
        let local_addr = inner.local_addr().map_err(StartupError::BindFailure)?;

        tracing::info!(
            address = %local_addr,
            max_connections = limits.max_connections,
            "listener bound"
        );

        Ok(Self {
            inner,
            connection_limit: Arc::new(Semaphore::new(limits.max_connections)),
        })
    }

    /// Accept a new connection, respecting the connection limit.
    ///
    /// Returns the stream, the peer address, and a permit that must be held
    /// for the connection's lifetime.
    pub async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr, ConnectionPermit)> {
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .expect("connection semaphore is never closed");

        let (stream, addr) = self.inner.accept().await?;

        tracing::trace!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "connection accepted"
        );

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    /// The local address this listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

/// A slot in the connection limit, released on drop.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: OwnedSemaphorePermit,
}
