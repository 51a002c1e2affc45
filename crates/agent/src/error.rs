// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent error types.

use crate::client::ClientError;
use muster_core::Component;
use thiserror::Error;

/// Errors surfaced by the agent runtime.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Operation attempted after (or during) shutdown.
    #[error("agent is closed")]
    Closed,

    /// `accept`'s bounded readiness wait expired.
    #[error("timed out waiting for a job")]
    Timeout,

    /// Transport failure while opening the config stream or sending
    /// the registration handshake.
    #[error("registration failed: {0}")]
    Registration(#[source] ClientError),

    /// The agent exited before completing registration (config stream
    /// died before the first config was processed).
    #[error("agent exited before first config processing")]
    EarlyExit,

    /// Transport failure while requesting a job from the server.
    /// Distinct from `DispatchFailed` so callers can tell "server
    /// unreachable" from "provider failed".
    #[error("failed to request a job: {0}")]
    JobRequest(#[source] ClientError),

    /// No provider registered for the job's component, or the
    /// provider itself failed. Local to that one job.
    #[error("job dispatch failed for {component}: {reason}")]
    DispatchFailed { component: Component, reason: String },

    /// One or more cleanup actions failed during `close`. Shutdown
    /// still completed; the failures are reported for diagnosis.
    #[error("cleanup failed: {}", .0.join("; "))]
    Cleanup(Vec<String>),
}
