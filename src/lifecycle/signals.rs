//! OS signal handling.
//!
//! SIGINT, SIGHUP, SIGTERM and SIGQUIT all request the same graceful
//! shutdown. Handlers are installed up front so a signal arriving while the
//! service is still starting is not lost.

use std::future::Future;
use std::io;

/// Install the termination handlers and return a future resolving on the
/// first termination signal.
#[cfg(unix)]
pub fn termination() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    Ok(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = hangup.recv() => "SIGHUP",
            _ = terminate.recv() => "SIGTERM",
            _ = quit.recv() => "SIGQUIT",
        };
        tracing::info!(signal = name, "Termination signal received");
    })
}

/// Install the termination handler and return a future resolving on Ctrl+C.
#[cfg(not(unix))]
pub fn termination() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!(signal = "ctrl-c", "Termination signal received");
    })
}
