// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for in-crate tests.

use crate::component::{Provider, ProviderError};
use async_trait::async_trait;
use muster_core::{Component, ComponentType, Job, JobId};
use std::time::Duration;

/// Provider that returns the job payload unchanged.
pub(crate) struct Echo;

#[async_trait]
impl Provider for Echo {
    async fn execute(&self, job: &Job) -> Result<serde_json::Value, ProviderError> {
        Ok(job.payload.clone())
    }
}

/// Provider that sleeps before succeeding, for drain tests.
pub(crate) struct Sleepy(pub Duration);

#[async_trait]
impl Provider for Sleepy {
    async fn execute(&self, job: &Job) -> Result<serde_json::Value, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(job.payload.clone())
    }
}

/// Provider that always fails.
pub(crate) struct Broken;

#[async_trait]
impl Provider for Broken {
    async fn execute(&self, _job: &Job) -> Result<serde_json::Value, ProviderError> {
        Err("provider exploded".into())
    }
}

/// A build/docker job with an empty payload.
pub(crate) fn build_job(id: &str) -> Job {
    Job {
        id: JobId::new(id),
        component: Component::new(ComponentType::Build, "docker"),
        payload: serde_json::Value::Null,
    }
}
