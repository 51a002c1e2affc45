// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the agent crate.

use std::time::Duration;

/// Log verbosity variable. Read once at startup for the baseline
/// filter and also settable through a server-pushed config update
/// (the apply path watches for this name).
pub const LOG_LEVEL_VAR: &str = "MUSTER_LOG_LEVEL";

/// Default `accept` timeout override (milliseconds). Unset means
/// accept blocks until a job arrives or the agent exits.
pub fn accept_timeout() -> Option<Duration> {
    std::env::var("MUSTER_ACCEPT_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Baseline log level: `MUSTER_LOG_LEVEL` or "info".
pub fn log_level() -> String {
    std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| "info".to_string())
}
