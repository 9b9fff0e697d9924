//! The contract between the coordinator and the service it runs.

use std::future::Future;

use tokio::sync::oneshot;

/// Termination notice of a running service.
///
/// Resolves with `Ok(())` when the service ended on its own without error,
/// or with the error that brought it down. A dropped sender counts as a
/// clean end.
pub type StopNotice<E> = oneshot::Receiver<Result<(), E>>;

/// A long-running service driven by [`Lifecycle`](super::Lifecycle).
pub trait Service: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start serving. The returned notice fires if the service stops by
    /// itself.
    fn start(&self) -> impl Future<Output = Result<StopNotice<Self::Error>, Self::Error>> + Send;

    /// Stop serving and release resources. Called at most once, after a
    /// successful [`start`](Service::start). `cause` describes the failure
    /// that triggered the stop, if any.
    fn stop(&self, cause: Option<String>) -> impl Future<Output = ()> + Send;
}
