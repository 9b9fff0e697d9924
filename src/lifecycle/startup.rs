//! Startup orchestration.
//!
//! Construction and start are strictly ordered and never retried: a service
//! that cannot be built is never started, and a failed start needs no
//! cleanup because nothing is serving yet.

use std::future::Future;
use std::sync::Arc;

use crate::lifecycle::service::{Service, StopNotice};
use crate::lifecycle::LifecycleError;

/// Build the service, then start it.
pub async fn launch<S, B>(
    build: B,
) -> Result<(Arc<S>, StopNotice<S::Error>), LifecycleError<S::Error>>
where
    S: Service,
    B: Future<Output = Result<S, S::Error>>,
{
    let service = build.await.map_err(LifecycleError::Construction)?;
    tracing::debug!("Service constructed");

    let service = Arc::new(service);
    let notice = service.start().await.map_err(LifecycleError::Start)?;
    Ok((service, notice))
}
