// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container runtime contract: create/start/list-with-filter-by-exit-code/
//! remove, plus a best-effort kill used by the event daemon when placement
//! is withdrawn for a running instance.

mod fake;
mod real;

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRuntime;
pub use real::DockerRuntime;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("container {0} not found")]
    NotFound(String),
    #[error("container runtime api error: {0}")]
    Api(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: String,
    pub command: String,
}

/// The four views the state monitor needs on every scan: every exited
/// container id, the subset that exited 0, the subset that exited 137,
/// and a cid → exit-code map for everything else (1..=255, excluding
/// 137).
#[derive(Debug, Clone, Default)]
pub struct ExitSets {
    pub exited: HashSet<String>,
    pub finished: HashSet<String>,
    pub killed: HashSet<String>,
    pub aborted: HashMap<String, u16>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Create a container for `spec`; returns the runtime-assigned id.
    async fn create(&self, spec: &ContainerSpec) -> Result<String, RuntimeError>;

    /// True if `container_id` currently appears in the runtime's listing
    /// (used right after create, before start, per the configure
    /// protocol).
    async fn exists(&self, container_id: &str) -> Result<bool, RuntimeError>;

    async fn start(&self, container_id: &str) -> Result<(), RuntimeError>;

    /// Best-effort kill; callers treat failure as non-fatal.
    async fn kill(&self, container_id: &str) -> Result<(), RuntimeError>;

    async fn remove(&self, container_id: &str) -> Result<(), RuntimeError>;

    async fn exit_sets(&self) -> Result<ExitSets, RuntimeError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
