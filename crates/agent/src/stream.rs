// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration and config-stream processing.
//!
//! `start` opens the stream, sends the handshake, and launches two
//! cooperating tasks: a receive task pulling messages off the wire and
//! an apply task consuming them one at a time. The split keeps a slow
//! apply (dynamic source lookups) from stalling stream reads. Any
//! receive or apply failure is terminal for the stream processor —
//! there is no reconnect at this layer — and always lands in the
//! stream monitor's exit flag so every blocked operation returns
//! promptly instead of hanging.

use crate::client::ConfigStream;
use crate::state::Wake;
use crate::{config, env, Agent, AgentError};
use muster_wire::ConfigUpdate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Depth of the receive -> apply queue. One message may queue behind
/// the one being applied; beyond that the receive task waits.
const APPLY_QUEUE_DEPTH: usize = 1;

impl Agent {
    /// Register with the server and process its config stream.
    ///
    /// Returns once the first configuration pass has completed, which
    /// guarantees callers never begin accepting jobs unconfigured.
    /// Transport failures during the handshake are returned directly;
    /// there is no retry here.
    pub async fn start(self: &Arc<Self>) -> Result<(), AgentError> {
        if self.run.read(|r| r.shutdown) {
            return Err(AgentError::Closed);
        }

        debug!(id = %self.id, "registering agent");
        let (stream, handle) = self
            .client
            .open_config_stream(self.hello())
            .await
            .map_err(AgentError::Registration)?;
        self.cleanup.register("config stream send side", move || {
            handle.close_send().map_err(|e| e.to_string())
        });
        self.stream.update(|s| s.connected = true);

        let (tx, rx) = mpsc::channel(APPLY_QUEUE_DEPTH);
        tokio::spawn(Arc::clone(self).run_receive(stream, tx));
        tokio::spawn(Arc::clone(self).run_apply(rx));

        debug!(id = %self.id, "agent registered, waiting for first config processing");
        if self.stream.wait_flag(|s| s.first_config_processed).await == Wake::Exited {
            return Err(AgentError::EarlyExit);
        }

        info!(id = %self.id, "agent registered with server and ready");
        Ok(())
    }

    /// Receive task: pull config messages off the stream and queue
    /// them for the apply task. Ends on stream error, stream EOF, or
    /// root-context cancellation; every ending signals exit.
    async fn run_receive(
        self: Arc<Self>,
        mut stream: Box<dyn ConfigStream>,
        tx: mpsc::Sender<ConfigUpdate>,
    ) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("config stream receive cancelled");
                    break;
                }
                msg = stream.recv() => match msg {
                    Ok(Some(update)) => {
                        if tx.send(update).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        warn!("server closed the config stream");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "config stream receive failed");
                        break;
                    }
                },
            }
        }

        self.stream.update(|s| {
            s.connected = false;
            s.exit = true;
        });
    }

    /// Apply task: consume queued updates one at a time. Serialized so
    /// the first-config-processed and ready-for-jobs transitions stay
    /// well ordered, and so the process environment has a single
    /// writer. Ends when the receive task drops the queue.
    async fn run_apply(self: Arc<Self>, mut rx: mpsc::Receiver<ConfigUpdate>) {
        while let Some(update) = rx.recv().await {
            let resolved = config::resolve_vars(&update.vars, &self.sourcers).await;
            {
                let mut sandbox = self.sandbox.lock();
                sandbox.apply(&resolved);
            }
            debug!(vars = resolved.len(), "applied config update");

            // Settings arrive whole on each update: an absent cap
            // means unlimited, not unchanged.
            self.run.update(|r| r.concurrency_limit = update.settings.max_concurrency);

            if let Some(handle) = &self.log_reload {
                if let Some(level) = resolved.get(env::LOG_LEVEL_VAR) {
                    handle.set_level(level);
                }
            }

            self.stream.update(|s| {
                s.first_config_processed = true;
                s.ready_for_jobs = true;
            });
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
