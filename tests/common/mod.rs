//! Shared utilities for lifecycle and gateway tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use resgate::lifecycle::{Service, StopNotice};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// How the mock behaves when stopped.
#[derive(Debug, Clone, Copy)]
pub enum StopBehavior {
    Immediate,
    After(Duration),
    Never,
}

/// Observation and control side of a [`MockService`], kept by the test.
pub struct Probe {
    pub starts: AtomicU32,
    pub stops: AtomicU32,
    pub causes: Mutex<Vec<Option<String>>>,
    fail_start: bool,
    stop_behavior: StopBehavior,
    notify: Mutex<Option<oneshot::Sender<Result<(), MockError>>>>,
}

impl Probe {
    pub fn new(stop_behavior: StopBehavior) -> Arc<Self> {
        Self::build(stop_behavior, false)
    }

    /// A probe whose service refuses to start.
    pub fn failing_start() -> Arc<Self> {
        Self::build(StopBehavior::Immediate, true)
    }

    fn build(stop_behavior: StopBehavior, fail_start: bool) -> Arc<Self> {
        Arc::new(Self {
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
            causes: Mutex::new(Vec::new()),
            fail_start,
            stop_behavior,
            notify: Mutex::new(None),
        })
    }

    /// Report a failure from inside the running service.
    pub fn fail(&self, message: &str) {
        let notify = self.notify.lock().unwrap().take().expect("service not started");
        notify.send(Err(MockError(message.into()))).unwrap();
    }

    /// Report that the service ended by itself without error.
    pub fn finish(&self) {
        let notify = self.notify.lock().unwrap().take().expect("service not started");
        notify.send(Ok(())).unwrap();
    }

    pub fn starts(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn service(self: &Arc<Self>) -> MockService {
        MockService {
            probe: Arc::clone(self),
        }
    }
}

/// Service double driven through its [`Probe`].
pub struct MockService {
    probe: Arc<Probe>,
}

impl Service for MockService {
    type Error = MockError;

    async fn start(&self) -> Result<StopNotice<MockError>, MockError> {
        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        if self.probe.fail_start {
            return Err(MockError("address in use".into()));
        }
        let (tx, rx) = oneshot::channel();
        *self.probe.notify.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn stop(&self, cause: Option<String>) {
        self.probe.stops.fetch_add(1, Ordering::SeqCst);
        self.probe.causes.lock().unwrap().push(cause);
        match self.probe.stop_behavior {
            StopBehavior::Immediate => {}
            StopBehavior::After(delay) => tokio::time::sleep(delay).await,
            StopBehavior::Never => std::future::pending::<()>().await,
        }
    }
}
