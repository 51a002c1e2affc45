// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup with a runtime-reloadable level filter.
//!
//! The baseline level comes from `MUSTER_LOG_LEVEL` at startup; the
//! server can retune it later by pushing the same-named variable in a
//! config update, which the apply path routes to `LogLevelHandle`.

use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, Registry};

/// Handle for changing the active log filter at runtime.
#[derive(Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Swap the active filter. Invalid directives are rejected with a
    /// warning; the previous filter stays in place.
    pub fn set_level(&self, level: &str) {
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    warn!(level, error = %e, "failed to reload log filter");
                } else {
                    info!(level, "log level updated from config");
                }
            }
            Err(e) => {
                warn!(level, error = %e, "invalid log level directive ignored");
            }
        }
    }
}

/// Install the global subscriber. Call once at process start.
///
/// Returns the reload handle to wire into `AgentBuilder::log_reload`
/// so pushed config can change verbosity.
pub fn init() -> LogLevelHandle {
    let baseline =
        EnvFilter::try_new(crate::env::log_level()).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(baseline);

    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();

    LogLevelHandle { handle }
}
