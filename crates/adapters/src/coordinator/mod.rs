// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator client contract: a hierarchical, watchable key-value store
//! with ephemeral nodes, matching the `get`/`exists`/`create`/`delete`/
//! `children`/`watch_data`/`watch_children` operations the pipeline
//! assumes. Watch callbacks are expressed as channels rather than raw
//! function pointers — callers drain them serially in a `tokio::select!`
//! loop, which preserves the "callbacks run serially, watch re-armed
//! after every callback" contract without forcing a boxed-closure API.

mod fake;
mod real;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCoordinator;
pub use real::EtcdCoordinator;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("no node at {0}")]
    NoNode(String),
    #[error("node already exists at {0}")]
    NodeExists(String),
    #[error("connection to coordinator lost")]
    ConnectionLoss,
    #[error("coordinator error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Suspended,
    Lost,
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub payload: Vec<u8>,
    pub ephemeral: bool,
}

#[derive(Debug, Clone)]
pub enum DataEvent {
    Updated(Vec<u8>),
    Deleted,
}

#[derive(Debug, Clone)]
pub enum ChildrenEvent {
    Updated(Vec<String>),
}

#[async_trait]
pub trait Coordinator: Send + Sync {
    async fn get(&self, path: &str) -> Result<NodeData, CoordinatorError>;
    async fn exists(&self, path: &str) -> Result<bool, CoordinatorError>;
    async fn create(&self, path: &str, data: &[u8], ephemeral: bool) -> Result<(), CoordinatorError>;
    /// Unconditional overwrite, creating the node if absent. Used for
    /// best-effort summary updates where "already exists" is not an
    /// error to swallow but the expected common case.
    async fn set_data(&self, path: &str, data: &[u8]) -> Result<(), CoordinatorError>;
    async fn delete(&self, path: &str) -> Result<(), CoordinatorError>;
    async fn children(&self, path: &str) -> Result<Vec<String>, CoordinatorError>;
    async fn watch_data(&self, path: &str) -> Result<mpsc::Receiver<DataEvent>, CoordinatorError>;
    async fn watch_children(
        &self,
        path: &str,
    ) -> Result<mpsc::Receiver<ChildrenEvent>, CoordinatorError>;
    fn session_state(&self) -> SessionState;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
