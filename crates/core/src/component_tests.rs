// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn component_type_display() {
    assert_eq!(ComponentType::Build.to_string(), "build");
    assert_eq!(ComponentType::RegistryPush.to_string(), "registry-push");
    assert_eq!(ComponentType::Deploy.to_string(), "deploy");
    assert_eq!(ComponentType::Release.to_string(), "release");
    assert_eq!(ComponentType::TaskLaunch.to_string(), "task-launch");
}

#[test]
fn component_display_joins_type_and_name() {
    let c = Component::new(ComponentType::Deploy, "kubernetes");
    assert_eq!(c.to_string(), "deploy/kubernetes");
}

#[test]
fn component_type_serde_is_snake_case() {
    let json = serde_json::to_string(&ComponentType::TaskLaunch).unwrap();
    assert_eq!(json, "\"task_launch\"");
}

#[test]
fn component_serde_round_trip() {
    let c = Component::new(ComponentType::Build, "docker");
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.contains("\"type\":\"build\""));

    let parsed: Component = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, c);
}

#[test]
fn all_covers_every_type() {
    assert_eq!(ComponentType::ALL.len(), 5);
}
