use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use ngsc_terminal::http_client::ApiError;
use ngsc_terminal::sync;

#[test]
fn results_are_delivered_until_cancelled() {
    let (result_tx, result_rx) = mpsc::channel();
    let handle = sync::start(
        Duration::from_millis(20),
        || Ok(42u32),
        move |result: Result<u32, ApiError>| {
            let _ = result_tx.send(result);
        },
    );

    let first = result_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("first delivery");
    assert_eq!(first.expect("fetch result"), 42);

    handle.cancel();
    assert!(handle.is_cancelled());
}

#[test]
fn result_in_flight_at_cancellation_is_discarded() {
    // The fetch announces it has started, then blocks on the gate so
    // the test can cancel mid-flight before letting it resolve.
    let (started_tx, started_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let delivered = Arc::new(AtomicUsize::new(0));
    let delivered_in_loop = delivered.clone();

    let handle = sync::start(
        Duration::from_millis(10),
        move || {
            let _ = started_tx.send(());
            let _ = gate_rx.recv();
            Ok(7u32)
        },
        move |_result: Result<u32, ApiError>| {
            delivered_in_loop.fetch_add(1, Ordering::SeqCst);
        },
    );

    started_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("fetch should have started");
    handle.cancel();
    gate_tx.send(()).expect("unblock fetch");

    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(
        delivered.load(Ordering::SeqCst),
        0,
        "result resolved after cancel must not be delivered"
    );
}

#[test]
fn dropping_the_handle_stops_the_loop() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let fetch_count = fetches.clone();

    let handle = sync::start(
        Duration::from_millis(10),
        move || {
            fetch_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
        |_result: Result<(), ApiError>| {},
    );

    // Let it run at least once, then drop.
    std::thread::sleep(Duration::from_millis(100));
    assert!(fetches.load(Ordering::SeqCst) >= 1);
    drop(handle);

    std::thread::sleep(Duration::from_millis(200));
    let after_drop = fetches.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(300));
    assert!(
        fetches.load(Ordering::SeqCst) <= after_drop + 1,
        "loop kept fetching after the handle was dropped"
    );
}
