//! TCP listener setup.

use std::net::{SocketAddr, TcpListener};

use thiserror::Error;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),
    /// Failed to prepare the bound socket.
    #[error("Failed to configure listener: {0}")]
    Configure(#[source] std::io::Error),
}

/// Bind a listener for client connections.
///
/// The socket is switched to non-blocking mode so the async server can
/// adopt it.
pub fn bind(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(addr).map_err(|e| ListenerError::Bind(addr, e))?;
    listener
        .set_nonblocking(true)
        .map_err(ListenerError::Configure)?;

    let local_addr = listener.local_addr().map_err(ListenerError::Configure)?;
    tracing::info!(address = %local_addr, "Listener bound");
    Ok(listener)
}
