// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tokio::time::timeout;

fn stream_monitor() -> Arc<Monitor<StreamState>> {
    Arc::new(Monitor::new(StreamState::default()))
}

fn run_monitor() -> Arc<Monitor<RunState>> {
    Arc::new(Monitor::new(RunState::default()))
}

#[tokio::test]
async fn wait_flag_returns_ready_when_flag_set() {
    let m = stream_monitor();
    let waiter = {
        let m = Arc::clone(&m);
        tokio::spawn(async move { m.wait_flag(|s| s.ready_for_jobs).await })
    };

    m.update(|s| s.ready_for_jobs = true);
    let wake = waiter.await.unwrap();
    assert_eq!(wake, Wake::Ready);
}

#[tokio::test]
async fn wait_flag_returns_immediately_when_already_set() {
    let m = stream_monitor();
    m.update(|s| s.first_config_processed = true);
    let wake = m.wait_flag(|s| s.first_config_processed).await;
    assert_eq!(wake, Wake::Ready);
}

#[tokio::test]
async fn exit_wakes_every_waiter_regardless_of_flag() {
    // One exit broadcast unblocks waiters on three different flags.
    let m = stream_monitor();
    let flags: [fn(&StreamState) -> bool; 3] = [
        |s| s.connected,
        |s| s.first_config_processed,
        |s| s.ready_for_jobs,
    ];
    let waiters: Vec<_> = flags
    .into_iter()
    .map(|flag| {
        let m = Arc::clone(&m);
        tokio::spawn(async move { m.wait_flag(flag).await })
    })
    .collect();

    // Let all waiters park before signaling.
    tokio::task::yield_now().await;
    m.signal_exit();

    for waiter in waiters {
        let wake = timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert_eq!(wake, Wake::Exited);
    }
}

#[tokio::test]
async fn update_between_check_and_park_is_not_missed() {
    // The notified() registration happens before the predicate check,
    // so a broadcast racing with the wait is still observed.
    let m = stream_monitor();
    for _ in 0..100 {
        m.update(|s| s.ready_for_jobs = false);
        let waiter = {
            let m = Arc::clone(&m);
            tokio::spawn(async move { m.wait_flag(|s| s.ready_for_jobs).await })
        };
        m.update(|s| s.ready_for_jobs = true);
        let wake = timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert_eq!(wake, Wake::Ready);
    }
}

#[tokio::test]
async fn acquire_increments_and_drop_decrements() {
    let run = run_monitor();
    let slot = JobSlot::acquire(&run).await.unwrap();
    assert_eq!(run.read(|r| r.running_jobs), 1);

    let second = JobSlot::acquire(&run).await.unwrap();
    assert_eq!(run.read(|r| r.running_jobs), 2);

    drop(slot);
    assert_eq!(run.read(|r| r.running_jobs), 1);
    drop(second);
    assert_eq!(run.read(|r| r.running_jobs), 0);
}

#[tokio::test]
async fn acquire_fails_after_shutdown() {
    let run = run_monitor();
    run.update(|r| r.shutdown = true);
    assert!(JobSlot::acquire(&run).await.is_none());
    assert_eq!(run.read(|r| r.running_jobs), 0);
}

#[tokio::test]
async fn acquire_waits_for_capacity() {
    // With the limit saturated, acquire parks until a slot frees.
    let run = run_monitor();
    run.update(|r| r.concurrency_limit = Some(1));
    let held = JobSlot::acquire(&run).await.unwrap();

    let waiting = {
        let run = Arc::clone(&run);
        tokio::spawn(async move { JobSlot::acquire(&run).await })
    };
    tokio::task::yield_now().await;
    assert!(!waiting.is_finished());

    drop(held);
    let slot = timeout(Duration::from_secs(1), waiting).await.unwrap().unwrap();
    assert!(slot.is_some());
    assert_eq!(run.read(|r| r.running_jobs), 1);
}

#[tokio::test]
async fn shutdown_rejects_a_capacity_waiter() {
    // A waiter parked on the limit must observe shutdown, not hang.
    let run = run_monitor();
    run.update(|r| r.concurrency_limit = Some(1));
    let held = JobSlot::acquire(&run).await.unwrap();

    let waiting = {
        let run = Arc::clone(&run);
        tokio::spawn(async move { JobSlot::acquire(&run).await })
    };
    tokio::task::yield_now().await;

    run.update(|r| r.shutdown = true);
    let slot = timeout(Duration::from_secs(1), waiting).await.unwrap().unwrap();
    assert!(slot.is_none());

    drop(held);
    assert_eq!(run.read(|r| r.running_jobs), 0);
}

#[tokio::test]
async fn slot_released_on_panic() {
    // The drop guard releases the slot even when execution panics.
    let run = run_monitor();
    let handle = {
        let run = Arc::clone(&run);
        tokio::spawn(async move {
            let _slot = JobSlot::acquire(&run).await.unwrap();
            panic!("provider exploded");
        })
    };
    assert!(handle.await.is_err());
    assert_eq!(run.read(|r| r.running_jobs), 0);
}

#[tokio::test]
async fn drain_wait_sets_shutdown_atomically() {
    // wait_then observes running_jobs == 0 and sets shutdown in the
    // same lock acquisition, so no acquisition can interleave.
    let run = run_monitor();
    let slot = JobSlot::acquire(&run).await.unwrap();

    let drain = {
        let run = Arc::clone(&run);
        tokio::spawn(async move {
            run.wait_then(|r| {
                if r.running_jobs == 0 {
                    r.shutdown = true;
                    Some(())
                } else {
                    None
                }
            })
            .await
        })
    };

    tokio::task::yield_now().await;
    assert!(!drain.is_finished());

    drop(slot);
    timeout(Duration::from_secs(1), drain).await.unwrap().unwrap();
    assert!(run.read(|r| r.shutdown));
    assert!(JobSlot::acquire(&run).await.is_none());
}
