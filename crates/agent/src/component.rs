// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability provider registry.
//!
//! The agent core never implements a job type itself: it advertises
//! the registered (type, name) pairs at registration and dispatches
//! by the same pair at job time. Provider internals are opaque.

use async_trait::async_trait;
use muster_core::{Component, ComponentType, Job};
use std::collections::HashMap;
use std::sync::Arc;

/// Provider-side failures are opaque to the core.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// One pluggable implementation of a job type.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute one job to completion, returning its output payload.
    /// Implementations should honor cancellation internally; the core
    /// imposes no execution deadline.
    async fn execute(&self, job: &Job) -> Result<serde_json::Value, ProviderError>;
}

/// Mapping from (component type, provider name) to provider.
#[derive(Default)]
pub struct Registry {
    providers: HashMap<(ComponentType, String), Arc<dyn Provider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named provider for a component type. Re-registering
    /// the same (type, name) replaces the previous provider.
    pub fn register(
        &mut self,
        kind: ComponentType,
        name: impl Into<String>,
        provider: Arc<dyn Provider>,
    ) {
        self.providers.insert((kind, name.into()), provider);
    }

    /// Look up the provider for a component, if registered.
    pub fn get(&self, kind: ComponentType, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(&(kind, name.to_string())).cloned()
    }

    /// The advertised capability set, ordered by component type then
    /// name so registration output is stable.
    pub fn components(&self) -> Vec<Component> {
        let mut out: Vec<Component> = self
            .providers
            .keys()
            .map(|(kind, name)| Component::new(*kind, name.clone()))
            .collect();
        out.sort_by_key(|c| {
            let pos = ComponentType::ALL.iter().position(|t| *t == c.kind);
            (pos, c.name.clone())
        });
        out
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
