// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server client boundary.
//!
//! The orchestration server is an external collaborator; the agent
//! consumes it through these traits. A production binding (gRPC or
//! otherwise) lives in surrounding tooling, and tests use the
//! in-process fake in `test_support`.

use async_trait::async_trait;
use muster_core::{AgentId, Job, JobOutcome};
use muster_wire::{ConfigUpdate, Hello};
use thiserror::Error;

/// Transport-level failures from the server client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport: {0}")]
    Transport(String),

    /// The server ended the stream or connection.
    #[error("connection closed by server")]
    ConnectionClosed,
}

/// Client half of the agent <-> server contract.
#[async_trait]
pub trait ServerClient: Send + Sync + 'static {
    /// Open the long-lived registration stream and send the `Hello`
    /// handshake. Returns the receive half plus a handle that closes
    /// the send side (registered as a shutdown cleanup action).
    async fn open_config_stream(
        &self,
        hello: Hello,
    ) -> Result<(Box<dyn ConfigStream>, Box<dyn StreamHandle>), ClientError>;

    /// Block until the server assigns this agent one job.
    async fn next_job(&self, agent: &AgentId) -> Result<Job, ClientError>;

    /// Report a job's terminal outcome back to the server.
    async fn complete_job(&self, outcome: JobOutcome) -> Result<(), ClientError>;
}

/// Receive half of the config stream.
#[async_trait]
pub trait ConfigStream: Send {
    /// Next config message. `Ok(None)` means the server closed the
    /// stream cleanly; both EOF and `Err` are fatal to the agent.
    async fn recv(&mut self) -> Result<Option<ConfigUpdate>, ClientError>;
}

/// Send half of the config stream. Nothing is sent after `Hello`; the
/// handle exists so shutdown can close the stream cleanly.
pub trait StreamHandle: Send {
    fn close_send(self: Box<Self>) -> Result<(), ClientError>;
}
