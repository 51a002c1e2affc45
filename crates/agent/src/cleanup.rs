// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shutdown cleanup registry.
//!
//! Actions are registered during startup and drained exactly once at
//! close, LIFO. A failing action never stops the remainder; failures
//! are collected and reported together.

use parking_lot::Mutex;
use tracing::debug;

type CleanupFn = Box<dyn FnOnce() -> Result<(), String> + Send>;

#[derive(Default)]
pub(crate) struct CleanupRegistry {
    actions: Mutex<Vec<(&'static str, CleanupFn)>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup action. Registration must complete before
    /// `close` is ever called (caller responsibility, not enforced).
    pub fn register(
        &self,
        label: &'static str,
        action: impl FnOnce() -> Result<(), String> + Send + 'static,
    ) {
        self.actions.lock().push((label, Box::new(action)));
    }

    /// Run all registered actions LIFO, draining the registry so each
    /// action runs exactly once even if `run` is reached from multiple
    /// shutdown causes. Returns the collected failures.
    pub fn run(&self) -> Vec<String> {
        let mut actions = {
            let mut guard = self.actions.lock();
            std::mem::take(&mut *guard)
        };

        let mut failures = Vec::new();
        while let Some((label, action)) = actions.pop() {
            debug!(action = label, "running cleanup action");
            if let Err(e) = action() {
                failures.push(format!("{}: {}", label, e));
            }
        }
        failures
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
