// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job acceptance.
//!
//! One `accept` call = one job: wait for readiness, pull a job from
//! the server, take a running slot for it, dispatch it to the matching
//! capability provider, release the slot. The slot exists only while a
//! job actually executes and its release rides on a drop guard, so no
//! failure path can leak it and no idle accept can stall shutdown.

use crate::state::{JobSlot, Wake};
use crate::{Agent, AgentError};
use muster_core::{Job, JobOutcome};
use std::time::Duration;
use tracing::{debug, warn};

impl Agent {
    /// Wait for, pull, and execute one job.
    ///
    /// `timeout` bounds only the readiness wait (falling back to the
    /// builder/env default when `None`); once a job starts it runs to
    /// completion. Fails with [`AgentError::Closed`] if shutdown was
    /// requested and [`AgentError::Timeout`] if the bound expires.
    pub async fn accept(&self, timeout: Option<Duration>) -> Result<JobOutcome, AgentError> {
        if self.run.read(|r| r.shutdown) {
            return Err(AgentError::Closed);
        }

        // 1. Readiness: at least one config pass has completed.
        let wait = self.stream.wait_flag(|s| s.ready_for_jobs);
        let wake = match timeout.or(self.accept_timeout) {
            Some(bound) => tokio::time::timeout(bound, wait)
                .await
                .map_err(|_| AgentError::Timeout)?,
            None => wait.await,
        };
        if wake == Wake::Exited {
            return Err(AgentError::Closed);
        }

        // 2. Pull one job, cancellable by the root context. No slot is
        // held while parked here: a jobless accept must never stall
        // close's drain, and close's cancel is what frees this wait.
        let job = tokio::select! {
            _ = self.cancel.cancelled() => return Err(AgentError::Closed),
            res = self.client.next_job(&self.id) => res.map_err(AgentError::JobRequest)?,
        };

        // 3. Take a slot for the assigned job. Readiness and shutdown
        // are independent flags, so shutdown is re-checked under the
        // run monitor; the wait also holds the job below any
        // server-pushed concurrency cap, and the guard's drop releases
        // the slot on every path.
        let Some(_slot) = JobSlot::acquire(&self.run).await else {
            return Err(AgentError::Closed);
        };

        // 4. Dispatch. Per-job failures are local: they fail this call
        // only and never touch the slot accounting of other jobs.
        self.execute(job).await
    }

    async fn execute(&self, job: Job) -> Result<JobOutcome, AgentError> {
        debug!(job = %job.id, component = %job.component, "dispatching job");

        let Some(provider) = self.registry.get(job.component.kind, &job.component.name) else {
            let outcome = JobOutcome::failed(job.id.clone(), "no registered provider");
            self.report(&outcome).await;
            return Err(AgentError::DispatchFailed {
                component: job.component,
                reason: "no registered provider".to_string(),
            });
        };

        match provider.execute(&job).await {
            Ok(output) => {
                let outcome = JobOutcome::success(job.id, output);
                self.report(&outcome).await;
                Ok(outcome)
            }
            Err(e) => {
                let outcome = JobOutcome::failed(job.id, e.to_string());
                self.report(&outcome).await;
                Err(AgentError::DispatchFailed {
                    component: job.component,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Best-effort completion report; the job's outcome stands locally
    /// even if the server missed it.
    async fn report(&self, outcome: &JobOutcome) {
        if let Err(e) = self.client.complete_job(outcome.clone()).await {
            warn!(job = %outcome.job_id, error = %e, "failed to report job outcome");
        }
    }
}

#[cfg(test)]
#[path = "accept_tests.rs"]
mod tests;
