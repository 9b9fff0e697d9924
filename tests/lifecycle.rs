//! Lifecycle coordinator tests against a service double.

use std::future::{pending, ready};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

use resgate::lifecycle::{Lifecycle, LifecycleError, LifecycleState};

mod common;
use common::{MockError, Probe, StopBehavior};

#[tokio::test]
async fn test_signal_stops_cleanly() {
    let probe = Probe::new(StopBehavior::Immediate);
    let lifecycle = Lifecycle::new();
    let states = lifecycle.subscribe();

    let result = lifecycle
        .run(ready(Ok(probe.service())), ready(()))
        .await;

    assert!(result.is_ok());
    assert_eq!(probe.starts(), 1);
    assert_eq!(probe.stops(), 1);
    assert_eq!(*probe.causes.lock().unwrap(), vec![None]);
    assert_eq!(*states.borrow(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_runtime_failure_stops_once_and_reports_error() {
    let probe = Probe::new(StopBehavior::Immediate);
    let lifecycle = Lifecycle::new();
    let mut states = lifecycle.subscribe();

    let service = probe.service();
    let run = tokio::spawn(lifecycle.run(ready(Ok(service)), pending()));

    states
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();
    probe.fail("nats connection lost");

    let err = run.await.unwrap().unwrap_err();
    match err {
        LifecycleError::Runtime(e) => assert_eq!(e, MockError("nats connection lost".into())),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(probe.stops(), 1);
    assert_eq!(
        *probe.causes.lock().unwrap(),
        vec![Some("nats connection lost".to_string())]
    );
}

#[tokio::test]
async fn test_runtime_failure_message_names_the_error() {
    let probe = Probe::new(StopBehavior::Immediate);
    let lifecycle = Lifecycle::new();
    let mut states = lifecycle.subscribe();

    let run = tokio::spawn(lifecycle.run(ready(Ok(probe.service())), pending()));
    states
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();
    probe.fail("listener closed");

    let err = run.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "Server stopped with an error: listener closed");
}

#[tokio::test]
async fn test_service_ending_cleanly_still_stops() {
    let probe = Probe::new(StopBehavior::Immediate);
    let lifecycle = Lifecycle::new();
    let mut states = lifecycle.subscribe();

    let run = tokio::spawn(lifecycle.run(ready(Ok(probe.service())), pending()));
    states
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();
    probe.finish();

    assert!(run.await.unwrap().is_ok());
    assert_eq!(probe.stops(), 1);
}

#[tokio::test]
async fn test_signal_during_running() {
    let probe = Probe::new(StopBehavior::Immediate);
    let lifecycle = Lifecycle::new();
    let mut states = lifecycle.subscribe();
    let (signal, received) = oneshot::channel::<()>();

    let run = tokio::spawn(lifecycle.run(ready(Ok(probe.service())), async move {
        let _ = received.await;
    }));
    states
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();
    assert_eq!(probe.stops(), 0);

    signal.send(()).unwrap();
    assert!(run.await.unwrap().is_ok());
    assert_eq!(probe.stops(), 1);
}

#[tokio::test]
async fn test_construction_failure_starts_nothing() {
    let lifecycle = Lifecycle::new();
    let states = lifecycle.subscribe();

    let result = lifecycle
        .run::<common::MockService, _, _>(
            ready(Err(MockError("bad TLS material".into()))),
            ready(()),
        )
        .await;

    assert!(matches!(result, Err(LifecycleError::Construction(_))));
    assert_eq!(*states.borrow(), LifecycleState::Starting);
}

#[tokio::test]
async fn test_start_failure_is_fatal_without_stop() {
    let probe = Probe::failing_start();
    let result = Lifecycle::new()
        .run(ready(Ok(probe.service())), pending())
        .await;

    match result {
        Err(LifecycleError::Start(e)) => assert_eq!(e.0, "address in use"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(probe.starts(), 1);
    assert_eq!(probe.stops(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hung_stop_times_out() {
    let probe = Probe::new(StopBehavior::Never);
    let lifecycle = Lifecycle::new();
    let states = lifecycle.subscribe();
    let started = Instant::now();

    let result = lifecycle
        .run(ready(Ok(probe.service())), ready(()))
        .await;

    match result {
        Err(LifecycleError::ShutdownTimeout(deadline)) => {
            assert_eq!(deadline, Duration::from_secs(10))
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(probe.stops(), 1);
    assert_eq!(*states.borrow(), LifecycleState::Aborted);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_wins_over_runtime_error() {
    let probe = Probe::new(StopBehavior::Never);
    let lifecycle = Lifecycle::new();
    let mut states = lifecycle.subscribe();

    let run = tokio::spawn(lifecycle.run(ready(Ok(probe.service())), pending()));
    states
        .wait_for(|s| *s == LifecycleState::Running)
        .await
        .unwrap();
    probe.fail("upstream gone");

    let err = run.await.unwrap().unwrap_err();
    assert!(matches!(err, LifecycleError::ShutdownTimeout(_)));
    assert_eq!(err.to_string(), "Shutdown timed out after 10s");
}

#[tokio::test(start_paused = true)]
async fn test_slow_stop_within_deadline() {
    let probe = Probe::new(StopBehavior::After(Duration::from_secs(9)));
    let result = Lifecycle::new()
        .run(ready(Ok(probe.service())), ready(()))
        .await;
    assert!(result.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_custom_stop_timeout() {
    let probe = Probe::new(StopBehavior::After(Duration::from_secs(3)));
    let result = Lifecycle::new()
        .with_stop_timeout(Duration::from_secs(2))
        .run(ready(Ok(probe.service())), ready(()))
        .await;
    assert!(matches!(
        result,
        Err(LifecycleError::ShutdownTimeout(d)) if d == Duration::from_secs(2)
    ));
}
