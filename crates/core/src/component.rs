// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability component types.
//!
//! A component is one (type, name) pair the agent can execute, e.g.
//! `(Build, "docker")`. The full set is advertised to the server at
//! registration and drives job dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a capability provider implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Produce an artifact from source
    Build,
    /// Push an artifact to a registry
    RegistryPush,
    /// Deploy an artifact to a platform
    Deploy,
    /// Promote a deployment to release traffic
    Release,
    /// Launch a one-off task
    TaskLaunch,
}

impl ComponentType {
    /// All component types, in dispatch-declaration order.
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Build,
        ComponentType::RegistryPush,
        ComponentType::Deploy,
        ComponentType::Release,
        ComponentType::TaskLaunch,
    ];
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentType::Build => "build",
            ComponentType::RegistryPush => "registry-push",
            ComponentType::Deploy => "deploy",
            ComponentType::Release => "release",
            ComponentType::TaskLaunch => "task-launch",
        };
        write!(f, "{}", s)
    }
}

/// One advertised capability: a component type plus the provider name
/// implementing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub name: String,
}

impl Component {
    pub fn new(kind: ComponentType, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
