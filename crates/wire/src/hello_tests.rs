// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use muster_core::ComponentType;

#[test]
fn default_flags_are_omitted() {
    let hello = Hello {
        id: AgentId::new("agt-1"),
        by_id_only: false,
        on_demand: false,
        components: vec![],
    };
    let json = serde_json::to_string(&hello).unwrap();
    assert!(!json.contains("by_id_only"));
    assert!(!json.contains("on_demand"));
}

#[test]
fn set_flags_survive_round_trip() {
    let hello = Hello {
        id: AgentId::new("agt-2"),
        by_id_only: true,
        on_demand: true,
        components: vec![Component::new(ComponentType::Build, "docker")],
    };
    let json = serde_json::to_string(&hello).unwrap();
    let parsed: Hello = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, hello);
}

#[test]
fn missing_fields_deserialize_to_defaults() {
    let hello: Hello = serde_json::from_str(r#"{"id":"agt-3"}"#).unwrap();
    assert!(!hello.by_id_only);
    assert!(!hello.on_demand);
    assert!(hello.components.is_empty());
}
