// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leaf types shared across the muster workspace: typed IDs,
//! capability components, and job descriptions.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod component;
mod id;
mod job;

pub use component::{Component, ComponentType};
pub use job::{Job, JobOutcome, JobResult};

crate::define_id! {
    /// Unique identifier for one agent process.
    ///
    /// Generated at construction unless the server hands the agent a
    /// pre-assigned ID (on-demand agents are launched with one).
    pub struct AgentId("agt-");
}

crate::define_id! {
    /// Unique identifier for one unit of dispatchable work.
    pub struct JobId("job-");
}
