// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config application: dynamic-var resolution and environment diffing.
//!
//! Every update is diffed against the process environment captured
//! before any update was ever applied. Diffing against the baseline
//! rather than the previous update keeps application idempotent and
//! immune to drift from repeated partial updates: re-applying the
//! same message is a no-op, and a key absent from the new message is
//! restored to (or removed back to) its original state.

use crate::source::Sourcer;
use muster_wire::{ConfigVar, VarValue};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Environment mutation engine. All process-env writes in the agent
/// go through here, serialized by the apply task; job execution treats
/// the environment as a read-only snapshot taken at job start.
pub(crate) struct EnvSandbox {
    /// Full process environment at capture time.
    original: HashMap<String, String>,
    /// Keys set by the most recent update.
    applied: HashSet<String>,
}

impl EnvSandbox {
    /// Snapshot the current process environment as the baseline.
    pub fn capture() -> Self {
        Self { original: std::env::vars().collect(), applied: HashSet::new() }
    }

    /// Apply a resolved variable set: keys from the previous update
    /// that are absent now revert to their baseline state, then every
    /// key in the new set is written.
    pub fn apply(&mut self, resolved: &HashMap<String, String>) {
        for stale in self.applied.iter().filter(|k| !resolved.contains_key(k.as_str())) {
            match self.original.get(stale) {
                Some(v) => {
                    debug!(var = %stale, "restoring original value");
                    std::env::set_var(stale, v);
                }
                None => {
                    debug!(var = %stale, "removing applied variable");
                    std::env::remove_var(stale);
                }
            }
        }

        for (name, value) in resolved {
            std::env::set_var(name, value);
        }
        self.applied = resolved.keys().cloned().collect();
    }
}

/// Resolve a config update's variables to concrete values.
///
/// Static values pass through; dynamic values go to the matching
/// sourcer. A missing sourcer or a failed lookup skips that one
/// variable with a warning, the rest still resolve. Later duplicates
/// of a name win.
pub(crate) async fn resolve_vars(
    vars: &[ConfigVar],
    sourcers: &HashMap<String, Arc<dyn Sourcer>>,
) -> HashMap<String, String> {
    let mut resolved = HashMap::new();
    for var in vars {
        match &var.value {
            VarValue::Static(value) => {
                resolved.insert(var.name.clone(), value.clone());
            }
            VarValue::Dynamic { source, config } => {
                let Some(sourcer) = sourcers.get(source) else {
                    warn!(var = %var.name, source = %source, "no such config source, skipping");
                    continue;
                };
                match sourcer.resolve(&var.name, config).await {
                    Ok(value) => {
                        resolved.insert(var.name.clone(), value);
                    }
                    Err(e) => warn!(var = %var.name, error = %e, "config source failed, skipping"),
                }
            }
        }
    }
    resolved
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
