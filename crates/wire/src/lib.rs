// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent <-> server protocol types.
//!
//! These are the messages exchanged over the registration stream and
//! the job RPCs. The transport itself (gRPC, websocket, in-process
//! fake) lives behind the `ServerClient` trait in `muster-agent`;
//! this crate only defines the payload shapes.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod hello;

pub use config::{AgentSettings, ConfigUpdate, ConfigVar, VarValue};
pub use hello::Hello;
