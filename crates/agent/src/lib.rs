// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet agent runtime.
//!
//! An agent is the node-local half of a job-dispatch system: it
//! registers with a central server, receives a configuration stream
//! from it, and pulls and executes one job at a time. To use one:
//!
//! 1. Construct it with [`AgentBuilder`]. This sets up state but does
//!    not touch the server.
//! 2. Call [`Agent::start`]. This opens the config stream, sends the
//!    registration handshake, and returns once the first config round
//!    trip is done.
//! 3. Call [`Agent::accept`] in a loop. Named after a network
//!    listener's accept: each call blocks until one job is available,
//!    executes it, and returns its outcome. Callers control their own
//!    concurrency by how many accept calls they run at once.
//! 4. Call [`Agent::close`]. This drains in-flight jobs, then tears
//!    the agent down; start and accept fail immediately afterwards.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod accept;
mod cleanup;
mod config;
mod error;
mod state;
mod stream;

pub mod client;
pub mod component;
pub mod env;
pub mod logging;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod test_fixtures;

pub use client::{ClientError, ConfigStream, ServerClient, StreamHandle};
pub use component::{Provider, ProviderError, Registry};
pub use error::AgentError;
pub use logging::LogLevelHandle;
pub use source::{SourceError, Sourcer};

use crate::cleanup::CleanupRegistry;
use crate::config::EnvSandbox;
use crate::state::{Monitor, RunState, StreamState};
use muster_core::AgentId;
use muster_wire::Hello;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A registered fleet agent. See the crate docs for the lifecycle.
///
/// All methods take `&self`; the agent is meant to live in an `Arc`
/// shared between the accept loop and whoever triggers shutdown.
pub struct Agent {
    id: AgentId,
    by_id_only: bool,
    on_demand: bool,

    client: Arc<dyn ServerClient>,
    registry: Registry,
    sourcers: HashMap<String, Arc<dyn Sourcer>>,
    accept_timeout: Option<Duration>,
    log_reload: Option<LogLevelHandle>,

    /// Job-count accounting monitor. Never held together with `stream`.
    run: Arc<Monitor<RunState>>,
    /// Config-stream lifecycle monitor.
    stream: Arc<Monitor<StreamState>>,
    /// Root context: cancelling it is the sole mechanism that unblocks
    /// a blocked stream receive.
    cancel: CancellationToken,
    cleanup: CleanupRegistry,
    /// Environment mutation engine, written only by the apply task.
    sandbox: Mutex<EnvSandbox>,
}

impl Agent {
    pub fn builder(client: impl ServerClient) -> AgentBuilder {
        AgentBuilder::new(client)
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// The registration handshake advertising this agent's identity.
    pub(crate) fn hello(&self) -> Hello {
        Hello {
            id: self.id.clone(),
            by_id_only: self.by_id_only,
            on_demand: self.on_demand,
            components: self.registry.components(),
        }
    }

    /// Gracefully shut the agent down.
    ///
    /// Waits for in-flight jobs to finish, then flips the shutdown
    /// flag, cancels the root context, and runs registered cleanup
    /// actions LIFO. After this returns, `start` and `accept` fail
    /// immediately with [`AgentError::Closed`]. Intentionally
    /// unbounded: providers are expected to honor cancellation.
    pub async fn close(&self) -> Result<(), AgentError> {
        info!(id = %self.id, "closing agent, draining in-flight jobs");

        // Drain, then set shutdown within the same lock acquisition so
        // no reservation can slip in between the two.
        self.run
            .wait_then(|r| {
                if r.running_jobs == 0 {
                    r.shutdown = true;
                    Some(())
                } else {
                    None
                }
            })
            .await;

        // Unblock the stream receive and any context-bound wait.
        self.cancel.cancel();

        // Wake condvar-style waiters directly rather than depending on
        // the receive task being scheduled to convert the cancellation.
        self.stream.signal_exit();

        let failures = self.cleanup.run();
        if failures.is_empty() {
            info!(id = %self.id, "agent closed");
            Ok(())
        } else {
            Err(AgentError::Cleanup(failures))
        }
    }
}

/// Builder for [`Agent`].
pub struct AgentBuilder {
    client: Arc<dyn ServerClient>,
    id: Option<AgentId>,
    by_id_only: bool,
    on_demand: bool,
    accept_timeout: Option<Duration>,
    registry: Registry,
    sourcers: HashMap<String, Arc<dyn Sourcer>>,
    log_reload: Option<LogLevelHandle>,
}

impl AgentBuilder {
    pub fn new(client: impl ServerClient) -> Self {
        Self {
            client: Arc::new(client),
            id: None,
            by_id_only: false,
            on_demand: false,
            accept_timeout: None,
            registry: Registry::new(),
            sourcers: HashMap::new(),
            log_reload: None,
        }
    }

    /// Use a server-assigned ID instead of generating one. On-demand
    /// agents are launched with the ID the server expects.
    pub fn id(mut self, id: AgentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Only jobs targeting this agent by ID may be assigned.
    pub fn by_id_only(mut self) -> Self {
        self.by_id_only = true;
        self
    }

    /// Flag this agent to the server as launched on demand.
    pub fn on_demand(mut self) -> Self {
        self.on_demand = true;
        self
    }

    /// Default bound on how long `accept` waits for readiness before
    /// giving up. Falls back to `MUSTER_ACCEPT_TIMEOUT_MS` when unset.
    pub fn accept_timeout(mut self, timeout: Duration) -> Self {
        self.accept_timeout = Some(timeout);
        self
    }

    /// Replace the whole capability registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one capability provider.
    pub fn provider(
        mut self,
        kind: muster_core::ComponentType,
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        self.registry.register(kind, name, provider);
        self
    }

    /// Register a dynamic config source by name.
    pub fn sourcer(mut self, name: impl Into<String>, sourcer: Arc<dyn Sourcer>) -> Self {
        self.sourcers.insert(name.into(), sourcer);
        self
    }

    /// Let pushed config retune log verbosity through this handle.
    pub fn log_reload(mut self, handle: LogLevelHandle) -> Self {
        self.log_reload = Some(handle);
        self
    }

    /// Construct the agent. Snapshots the process environment as the
    /// config-diff baseline; nothing touches the server yet.
    pub fn build(self) -> Agent {
        let id = self.id.unwrap_or_else(AgentId::generate);
        debug!(%id, components = self.registry.components().len(), "created agent");

        Agent {
            id,
            by_id_only: self.by_id_only,
            on_demand: self.on_demand,
            client: self.client,
            registry: self.registry,
            sourcers: self.sourcers,
            accept_timeout: self.accept_timeout.or_else(env::accept_timeout),
            log_reload: self.log_reload,
            run: Arc::new(Monitor::new(RunState::default())),
            stream: Arc::new(Monitor::new(StreamState::default())),
            cancel: CancellationToken::new(),
            cleanup: CleanupRegistry::new(),
            sandbox: Mutex::new(EnvSandbox::capture()),
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
