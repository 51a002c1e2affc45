// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job description and outcome types.
//!
//! A job names the capability component that should run it and carries
//! an opaque payload only the matching provider understands.

use crate::{Component, JobId};
use serde::{Deserialize, Serialize};

/// One unit of dispatchable work handed out by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Capability (type + provider name) this job targets.
    pub component: Component,
    /// Provider-specific payload, opaque to the agent core.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Terminal result of one job execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum JobResult {
    Success {
        #[serde(default)]
        output: serde_json::Value,
    },
    Failed {
        message: String,
    },
}

/// Completion report for one job, sent back to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub result: JobResult,
}

impl JobOutcome {
    pub fn success(job_id: JobId, output: serde_json::Value) -> Self {
        Self { job_id, result: JobResult::Success { output } }
    }

    pub fn failed(job_id: JobId, message: impl Into<String>) -> Self {
        Self { job_id, result: JobResult::Failed { message: message.into() } }
    }

    /// True if the job completed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.result, JobResult::Success { .. })
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
