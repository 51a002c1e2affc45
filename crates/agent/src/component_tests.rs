// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use muster_core::JobId;
use serde_json::json;

struct Echo;

#[async_trait]
impl Provider for Echo {
    async fn execute(&self, job: &Job) -> Result<serde_json::Value, ProviderError> {
        Ok(job.payload.clone())
    }
}

#[test]
fn lookup_hits_registered_provider() {
    let mut reg = Registry::new();
    reg.register(ComponentType::Build, "docker", Arc::new(Echo));

    assert!(reg.get(ComponentType::Build, "docker").is_some());
    assert!(reg.get(ComponentType::Build, "podman").is_none());
    assert!(reg.get(ComponentType::Deploy, "docker").is_none());
}

#[test]
fn components_are_ordered_by_type_then_name() {
    let mut reg = Registry::new();
    reg.register(ComponentType::TaskLaunch, "docker", Arc::new(Echo));
    reg.register(ComponentType::Build, "pack", Arc::new(Echo));
    reg.register(ComponentType::Build, "docker", Arc::new(Echo));

    let names: Vec<String> = reg.components().iter().map(|c| c.to_string()).collect();
    assert_eq!(names, vec!["build/docker", "build/pack", "task-launch/docker"]);
}

#[test]
fn reregistering_replaces() {
    let mut reg = Registry::new();
    reg.register(ComponentType::Build, "docker", Arc::new(Echo));
    reg.register(ComponentType::Build, "docker", Arc::new(Echo));
    assert_eq!(reg.components().len(), 1);
}

#[tokio::test]
async fn provider_executes_job() {
    let mut reg = Registry::new();
    reg.register(ComponentType::Build, "docker", Arc::new(Echo));

    let job = Job {
        id: JobId::new("job-1"),
        component: Component::new(ComponentType::Build, "docker"),
        payload: json!({"ref": "main"}),
    };
    let provider = reg.get(ComponentType::Build, "docker").unwrap();
    let output = provider.execute(&job).await.unwrap();
    assert_eq!(output, json!({"ref": "main"}));
}
