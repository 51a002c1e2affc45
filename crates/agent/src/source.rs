// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic config sources.
//!
//! A config update may reference variables to be resolved through a
//! named external source (e.g. a secret store). Sourcers are
//! individually failable: one failed lookup skips that variable and
//! is reported, the rest of the update still applies.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// A single sourcer's resolution failure.
///
/// The field is `source_name`, not `source`: thiserror reserves the
/// `source` name for error chaining.
#[derive(Debug, Error)]
#[error("config source {source_name} failed for {var}: {reason}")]
pub struct SourceError {
    pub source_name: String,
    pub var: String,
    pub reason: String,
}

/// Pluggable lookup for dynamically-sourced config variables.
#[async_trait]
pub trait Sourcer: Send + Sync {
    /// Resolve one variable from source-specific parameters.
    async fn resolve(
        &self,
        var: &str,
        config: &HashMap<String, String>,
    ) -> Result<String, SourceError>;
}
