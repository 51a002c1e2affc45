// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-pushed configuration messages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One configuration message from the server.
///
/// Each update is a complete statement of the environment the server
/// wants: the agent diffs `vars` against its original process
/// environment, never against the previous update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub vars: Vec<ConfigVar>,
    #[serde(default)]
    pub settings: AgentSettings,
}

/// One environment variable in a config update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigVar {
    pub name: String,
    pub value: VarValue,
}

impl ConfigVar {
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: VarValue::Static(value.into()) }
    }
}

/// A variable's value: inline, or resolved through a named config
/// source (e.g. a secret store) at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarValue {
    Static(String),
    Dynamic {
        /// Config source name, matched against registered sourcers.
        source: String,
        /// Source-specific lookup parameters.
        #[serde(default)]
        config: HashMap<String, String>,
    },
}

/// Agent-level settings carried alongside the variable deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Upper bound on concurrently executing jobs. Like `vars`, it
    /// arrives whole on each update: unset means unlimited, not
    /// unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<u32>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
