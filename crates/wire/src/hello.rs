// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration handshake message.

use muster_core::{AgentId, Component};
use serde::{Deserialize, Serialize};

/// First (and in steady state only) agent -> server message on the
/// config stream. Announces the agent's identity and the capability
/// components it can execute. The server is the source of truth for
/// agent state after this point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hello {
    pub id: AgentId,
    /// Only jobs targeting this agent by ID may be assigned.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub by_id_only: bool,
    /// This agent was launched on demand for a specific workload.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub on_demand: bool,
    /// Advertised capability set, in registration order.
    #[serde(default)]
    pub components: Vec<Component>,
}

#[cfg(test)]
#[path = "hello_tests.rs"]
mod tests;
