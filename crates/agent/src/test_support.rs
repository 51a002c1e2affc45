// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fake server for agent tests.
//!
//! `FakeServer` implements [`ServerClient`] entirely in memory: tests
//! push config updates and jobs in, and inspect what the agent sent
//! back. Cloning shares the same underlying server, so a test can
//! keep a control handle after giving a clone to the builder.

use crate::client::{ClientError, ConfigStream, ServerClient, StreamHandle};
use async_trait::async_trait;
use muster_core::{AgentId, Job, JobOutcome};
use muster_wire::{ConfigUpdate, Hello};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

type ConfigItem = Result<ConfigUpdate, ClientError>;

#[derive(Clone)]
pub struct FakeServer {
    inner: Arc<Inner>,
}

struct Inner {
    config_tx: Mutex<Option<mpsc::UnboundedSender<ConfigItem>>>,
    config_rx: Mutex<Option<mpsc::UnboundedReceiver<ConfigItem>>>,
    jobs: Mutex<VecDeque<Job>>,
    job_ready: Notify,
    hello: Mutex<Option<Hello>>,
    completed: Mutex<Vec<JobOutcome>>,
    send_closed: Arc<AtomicBool>,
    fail_open: AtomicBool,
}

impl FakeServer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(Inner {
                config_tx: Mutex::new(Some(tx)),
                config_rx: Mutex::new(Some(rx)),
                jobs: Mutex::new(VecDeque::new()),
                job_ready: Notify::new(),
                hello: Mutex::new(None),
                completed: Mutex::new(Vec::new()),
                send_closed: Arc::new(AtomicBool::new(false)),
                fail_open: AtomicBool::new(false),
            }),
        }
    }

    /// Make the next `open_config_stream` fail at the transport level.
    pub fn fail_next_open(&self) {
        self.inner.fail_open.store(true, Ordering::SeqCst);
    }

    /// Push one config update down the stream.
    pub fn push_config(&self, update: ConfigUpdate) {
        if let Some(tx) = self.inner.config_tx.lock().as_ref() {
            let _ = tx.send(Ok(update));
        }
    }

    /// Inject a fatal stream error after any queued updates.
    pub fn fail_stream(&self, reason: &str) {
        if let Some(tx) = self.inner.config_tx.lock().as_ref() {
            let _ = tx.send(Err(ClientError::Transport(reason.to_string())));
        }
    }

    /// End the config stream cleanly (server-side EOF).
    pub fn end_stream(&self) {
        self.inner.config_tx.lock().take();
    }

    /// Queue a job for the next `next_job` call.
    pub fn push_job(&self, job: Job) {
        self.inner.jobs.lock().push_back(job);
        self.inner.job_ready.notify_waiters();
    }

    /// The registration handshake received, if any.
    pub fn hello(&self) -> Option<Hello> {
        self.inner.hello.lock().clone()
    }

    /// Outcomes reported back by the agent, in order.
    pub fn completed(&self) -> Vec<JobOutcome> {
        self.inner.completed.lock().clone()
    }

    /// True once the agent closed its send side of the stream.
    pub fn send_side_closed(&self) -> bool {
        self.inner.send_closed.load(Ordering::SeqCst)
    }
}

impl Default for FakeServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerClient for FakeServer {
    async fn open_config_stream(
        &self,
        hello: Hello,
    ) -> Result<(Box<dyn ConfigStream>, Box<dyn StreamHandle>), ClientError> {
        if self.inner.fail_open.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Transport("dial refused".to_string()));
        }
        let Some(rx) = self.inner.config_rx.lock().take() else {
            return Err(ClientError::Transport("stream already open".to_string()));
        };
        *self.inner.hello.lock() = Some(hello);
        Ok((
            Box::new(FakeStream { rx }),
            Box::new(FakeHandle { closed: Arc::clone(&self.inner.send_closed) }),
        ))
    }

    async fn next_job(&self, _agent: &AgentId) -> Result<Job, ClientError> {
        loop {
            let notified = self.inner.job_ready.notified();
            if let Some(job) = self.inner.jobs.lock().pop_front() {
                return Ok(job);
            }
            notified.await;
        }
    }

    async fn complete_job(&self, outcome: JobOutcome) -> Result<(), ClientError> {
        self.inner.completed.lock().push(outcome);
        Ok(())
    }
}

struct FakeStream {
    rx: mpsc::UnboundedReceiver<ConfigItem>,
}

#[async_trait]
impl ConfigStream for FakeStream {
    async fn recv(&mut self) -> Result<Option<ConfigUpdate>, ClientError> {
        match self.rx.recv().await {
            Some(Ok(update)) => Ok(Some(update)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

struct FakeHandle {
    closed: Arc<AtomicBool>,
}

impl StreamHandle for FakeHandle {
    fn close_send(self: Box<Self>) -> Result<(), ClientError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
