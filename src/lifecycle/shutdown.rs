//! Shutdown with a hard deadline.

use std::sync::Arc;
use std::time::Duration;

use crate::lifecycle::service::Service;

/// The stop did not finish before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

/// Stop `service` and wait at most `deadline` for it to finish.
///
/// The stop runs on its own task. Missing the deadline does not cancel it;
/// the caller is expected to terminate the process instead.
pub async fn stop_within<S: Service>(
    service: Arc<S>,
    cause: Option<String>,
    deadline: Duration,
) -> Result<(), Elapsed> {
    let stopping = tokio::spawn(async move { service.stop(cause).await });

    match tokio::time::timeout(deadline, stopping).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Stop task failed");
            Ok(())
        }
        Err(_) => Err(Elapsed(deadline)),
    }
}
