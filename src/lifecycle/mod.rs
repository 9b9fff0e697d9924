//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build service → Start → Running
//!
//! Running:
//!     first of { termination signal (signals.rs), service failure notice }
//!
//! Shutdown (shutdown.rs):
//!     Stop service on its own task → Stopped
//!     deadline elapsed first      → Aborted
//! ```
//!
//! # Design Decisions
//! - Fail fast: construction and start errors are fatal
//! - A signal and a service failure both lead to the same graceful stop
//! - Stop is invoked exactly once and is never cancelled
//! - A stop that outlives its deadline ends the process abnormally

pub mod service;
pub mod shutdown;
pub mod signals;
pub mod startup;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::config::defaults::STOP_TIMEOUT;

pub use service::{Service, StopNotice};

/// Where the coordinator is in the process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
    Aborted,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Why the lifecycle ended unsuccessfully.
#[derive(Debug, Error)]
pub enum LifecycleError<E: std::error::Error + 'static> {
    /// The service could not be built from the configuration.
    #[error("Failed to initialize server: {0}")]
    Construction(#[source] E),

    /// The service failed to start.
    #[error("Failed to start server: {0}")]
    Start(#[source] E),

    /// The service failed while running and was stopped.
    #[error("Server stopped with an error: {0}")]
    Runtime(#[source] E),

    /// The service did not stop before the deadline.
    #[error("Shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),
}

/// Drives a [`Service`] from construction to shutdown.
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
    stop_timeout: Duration,
}

impl Lifecycle {
    /// Create a coordinator with the default stop deadline.
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Created);
        Self {
            state,
            stop_timeout: STOP_TIMEOUT,
        }
    }

    /// Override how long a stop may take before the process is aborted.
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Build and start the service, wait for `termination` or a service
    /// failure, then stop the service within the deadline.
    ///
    /// Returns `Ok(())` after a clean stop. A runtime failure is returned as
    /// [`LifecycleError::Runtime`] once the service has stopped.
    pub async fn run<S, B, T>(
        self,
        build: B,
        termination: T,
    ) -> Result<(), LifecycleError<S::Error>>
    where
        S: Service,
        B: Future<Output = Result<S, S::Error>>,
        T: Future<Output = ()>,
    {
        self.transition(LifecycleState::Starting);
        let (service, notice) = startup::launch(build).await?;
        self.transition(LifecycleState::Running);

        let failure = tokio::select! {
            _ = termination => None,
            notice = notice => match notice {
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "Server stopped with an error");
                    Some(err)
                }
                Ok(Ok(())) | Err(_) => {
                    tracing::info!("Server stopped");
                    None
                }
            },
        };

        self.transition(LifecycleState::Stopping);
        let cause = failure.as_ref().map(ToString::to_string);
        if let Err(shutdown::Elapsed(deadline)) =
            shutdown::stop_within(service, cause, self.stop_timeout).await
        {
            self.transition(LifecycleState::Aborted);
            return Err(LifecycleError::ShutdownTimeout(deadline));
        }
        self.transition(LifecycleState::Stopped);

        match failure {
            Some(err) => Err(LifecycleError::Runtime(err)),
            None => Ok(()),
        }
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "Lifecycle transition");
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
