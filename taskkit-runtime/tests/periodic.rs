mod common;

use common::{eventually, init_tracing, wait_stopped, MockKernel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use taskkit_runtime::{Task, TaskConfig, ThreadKernel};

#[tokio::test]
async fn wake_anchors_are_exactly_one_period_apart() {
    init_tracing();
    let kernel = MockKernel::dual_core();
    kernel.set_ticks(1_000);
    let task = Task::new(kernel.clone());

    let clock = kernel.clone();
    let mut calls = 0;
    task.run_every(
        move || {
            // Each iteration burns 3 ticks; anchoring must absorb it.
            clock.advance(3);
            calls += 1;
            calls < 6
        },
        &TaskConfig::default().with_name("sampler"),
        10,
    )
    .unwrap();
    wait_stopped(&task).await;

    assert_eq!(kernel.wakes(), vec![1_010, 1_020, 1_030, 1_040, 1_050]);
}

#[tokio::test]
async fn body_returning_false_on_kth_call_runs_exactly_k_times() {
    let kernel = MockKernel::dual_core();
    let task = Task::new(kernel.clone());

    for k in [1usize, 2, 7] {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        task.run_every(
            move || counter.fetch_add(1, Ordering::SeqCst) + 1 < k,
            &TaskConfig::default(),
            5,
        )
        .unwrap();
        wait_stopped(&task).await;
        assert_eq!(calls.load(Ordering::SeqCst), k);
    }
}

#[tokio::test]
async fn zero_period_runs_back_to_back() {
    let kernel = MockKernel::dual_core();
    let task = Task::new(kernel.clone());

    let mut calls = 0;
    task.run_every(
        move || {
            calls += 1;
            calls < 100
        },
        &TaskConfig::default(),
        0,
    )
    .unwrap();
    wait_stopped(&task).await;

    assert!(kernel.wakes().is_empty());
}

#[tokio::test]
async fn sub_tick_period_still_waits_one_tick() {
    // 100 Hz: 1 ms rounds down to zero ticks.
    let kernel = Arc::new(MockKernel::with(25, 2, 100));
    let task = Task::new(kernel.clone());

    let mut calls = 0;
    task.run_every(
        move || {
            calls += 1;
            calls < 4
        },
        &TaskConfig::default(),
        1,
    )
    .unwrap();
    wait_stopped(&task).await;

    assert_eq!(kernel.wakes(), vec![1, 2, 3]);
}

#[tokio::test]
async fn request_stop_ends_loop_within_a_period() {
    let kernel = Arc::new(ThreadKernel::default());
    let task = Task::new(kernel);
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    task.run_every(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        },
        &TaskConfig::default().with_name("poller"),
        20,
    )
    .unwrap();

    assert!(eventually(|| calls.load(Ordering::SeqCst) >= 2));
    let requested_at = Instant::now();
    task.request_stop();
    assert!(task.stop_requested());
    wait_stopped(&task).await;

    // One delay of at most a period, plus scheduling slack.
    assert!(requested_at.elapsed() < Duration::from_millis(500));
    assert!(!task.stop_requested());

    let after = calls.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(calls.load(Ordering::SeqCst), after);
}

#[tokio::test]
async fn stop_requested_is_visible_to_the_body() {
    let kernel = MockKernel::dual_core();
    let task = Arc::new(Task::new(kernel.clone()));
    let (seen_tx, seen_rx) = channel();

    task.run_every(
        move || {
            std::thread::sleep(Duration::from_millis(1));
            true
        },
        &TaskConfig::default(),
        1,
    )
    .unwrap();

    let observer = task.clone();
    std::thread::spawn(move || {
        observer.request_stop();
        seen_tx.send(observer.stop_requested()).unwrap();
    });

    assert!(seen_rx.recv_timeout(common::WAIT).unwrap());
    wait_stopped(&*task).await;
}

#[test]
fn dropping_a_running_handle_winds_the_loop_down() {
    init_tracing();
    let kernel = Arc::new(ThreadKernel::default());
    let (tx, rx) = channel();

    let task = Task::new(kernel);
    task.run_every(move || tx.send(()).is_ok(), &TaskConfig::default(), 5)
        .unwrap();
    rx.recv_timeout(common::WAIT).unwrap();

    drop(task);

    // The body (and its sender) is dropped once the loop sees the stop.
    let deadline = Instant::now() + common::WAIT;
    loop {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(()) => assert!(Instant::now() < deadline, "loop kept running"),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => assert!(Instant::now() < deadline),
        }
    }
}
