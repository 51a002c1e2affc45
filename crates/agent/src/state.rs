// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-change coordination.
//!
//! Two independent monitors guard the agent's mutable state: run state
//! (shutdown flag + in-flight job count) and stream state (config
//! stream lifecycle flags). Each monitor is a mutex plus a broadcast
//! wakeup; several distinct flags share one monitor, so every update
//! wakes all waiters and each waiter re-checks its own predicate.
//! No operation ever holds both monitors at once.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Config-stream lifecycle flags, guarded by one monitor.
#[derive(Debug, Default)]
pub(crate) struct StreamState {
    /// Config stream is connected.
    pub connected: bool,
    /// True once the first config message was processed, success or
    /// failure. Registration blocks on this, exactly once.
    pub first_config_processed: bool,
    /// Configuration has been applied at least once; jobs may be pulled.
    pub ready_for_jobs: bool,
    /// Fatal, unrecoverable condition. Absorbing: every waiter must
    /// wake and observe it even if its own flag never flips.
    pub exit: bool,
}

/// Job-accounting flags, guarded by the other monitor.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    /// True once shutdown has been requested. Monotonic.
    pub shutdown: bool,
    /// Jobs currently executing. Incremented exactly once per assigned
    /// job, decremented exactly once on completion via `JobSlot`.
    pub running_jobs: u32,
    /// Server-pushed cap on concurrent job execution. `None` means
    /// unlimited; each config update sets it whole.
    pub concurrency_limit: Option<u32>,
}

/// Why a stream-state wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The waited-on predicate became true.
    Ready,
    /// `exit` flipped; the waiter's own flag may never reach its value.
    Exited,
}

/// A mutex-guarded state group with broadcast wakeup.
///
/// `notified()` is registered before the predicate check so an update
/// between the check and the await still wakes the waiter (tokio's
/// `Notify::notify_waiters` reaches every future created before the
/// call).
pub(crate) struct Monitor<S> {
    state: Mutex<S>,
    notify: Notify,
}

impl<S> Monitor<S> {
    pub fn new(state: S) -> Self {
        Self { state: Mutex::new(state), notify: Notify::new() }
    }

    /// Read under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock())
    }

    /// Mutate under the lock, then wake all waiters.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let r = {
            let mut state = self.state.lock();
            f(&mut state)
        };
        self.notify.notify_waiters();
        r
    }

    /// Block until `ready` returns `Some`, re-checking under the lock
    /// on every wakeup. `ready` may mutate state on the hit (the
    /// mutation and the decision share one lock acquisition); waiters
    /// are woken afterwards in that case.
    pub async fn wait_then<R>(&self, mut ready: impl FnMut(&mut S) -> Option<R>) -> R {
        loop {
            let notified = self.notify.notified();
            let hit = {
                let mut state = self.state.lock();
                ready(&mut state)
            };
            if let Some(r) = hit {
                self.notify.notify_waiters();
                return r;
            }
            notified.await;
        }
    }
}

impl Monitor<StreamState> {
    /// Wait until `flag` is true or `exit` is set, whichever first.
    pub async fn wait_flag(&self, flag: impl Fn(&StreamState) -> bool) -> Wake {
        self.wait_then(|s| {
            if s.exit {
                Some(Wake::Exited)
            } else if flag(s) {
                Some(Wake::Ready)
            } else {
                None
            }
        })
        .await
    }

    /// Signal fatal exit, waking every waiter regardless of its flag.
    pub fn signal_exit(&self) {
        self.update(|s| s.exit = true);
    }
}

/// RAII hold on one running-job slot.
///
/// Acquired under the run monitor only while `shutdown` is false; the
/// drop decrements and broadcasts, so a panic or early return during
/// execution can never leak the slot.
pub(crate) struct JobSlot {
    run: Arc<Monitor<RunState>>,
}

impl JobSlot {
    /// Acquire a slot, waiting while the concurrency limit is
    /// saturated. Returns `None` once shutdown is requested; the
    /// shutdown check and the increment share one lock acquisition so
    /// no acquisition can slip in after the shutdown flag is set.
    ///
    /// Only held while a job actually executes. An accept call parked
    /// waiting for a job holds no slot, so shutdown's drain never
    /// waits on an idle accept.
    pub async fn acquire(run: &Arc<Monitor<RunState>>) -> Option<JobSlot> {
        let admitted = run
            .wait_then(|r| {
                if r.shutdown {
                    return Some(false);
                }
                if let Some(limit) = r.concurrency_limit {
                    if r.running_jobs >= limit {
                        return None;
                    }
                }
                r.running_jobs += 1;
                Some(true)
            })
            .await;
        admitted.then(|| JobSlot { run: Arc::clone(run) })
    }
}

impl Drop for JobSlot {
    fn drop(&mut self) {
        self.run.update(|r| {
            // Underflow here means a slot was released twice; the
            // acquire/drop pairing makes that unreachable.
            r.running_jobs -= 1;
        });
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
