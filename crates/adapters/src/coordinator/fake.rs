// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Coordinator`] for component tests. Not a mock: it
//! actually stores data and fans out watch events, so tests exercise the
//! real synchronise/publish/cleanup logic against it.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::mpsc;

use super::{ChildrenEvent, Coordinator, CoordinatorError, DataEvent, NodeData, SessionState};

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, NodeData>,
    data_watchers: HashMap<String, Vec<mpsc::Sender<DataEvent>>>,
    children_watchers: HashMap<String, Vec<mpsc::Sender<ChildrenEvent>>>,
    session: SessionState,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Connected
    }
}

pub struct FakeCoordinator {
    inner: Mutex<Inner>,
}

impl Default for FakeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn set_session_state(&self, state: SessionState) {
        self.inner.lock().session = state;
    }

    /// Test helper: seed a node directly, bypassing `create`'s
    /// already-exists check.
    pub fn seed(&self, path: &str, data: &[u8]) {
        self.inner.lock().nodes.insert(
            path.to_string(),
            NodeData {
                payload: data.to_vec(),
                ephemeral: false,
            },
        );
    }

    fn parent(path: &str) -> String {
        match path.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => parent.to_string(),
            _ => "/".to_string(),
        }
    }

    fn children_of(nodes: &HashMap<String, NodeData>, path: &str) -> Vec<String> {
        let prefix = format!("{path}/");
        let mut names: Vec<String> = nodes
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|s| s.to_string())
            .collect();
        names.sort();
        names
    }

    fn notify_children_change(inner: &mut Inner, path: &str) {
        let parent = Self::parent(path);
        if let Some(watchers) = inner.children_watchers.get(&parent) {
            let names = Self::children_of(&inner.nodes, &parent);
            for w in watchers {
                let _ = w.try_send(ChildrenEvent::Updated(names.clone()));
            }
        }
    }
}

#[async_trait]
impl Coordinator for FakeCoordinator {
    async fn get(&self, path: &str) -> Result<NodeData, CoordinatorError> {
        self.inner
            .lock()
            .nodes
            .get(path)
            .cloned()
            .ok_or_else(|| CoordinatorError::NoNode(path.to_string()))
    }

    async fn exists(&self, path: &str) -> Result<bool, CoordinatorError> {
        Ok(self.inner.lock().nodes.contains_key(path))
    }

    async fn create(&self, path: &str, data: &[u8], ephemeral: bool) -> Result<(), CoordinatorError> {
        let mut inner = self.inner.lock();
        if inner.nodes.contains_key(path) {
            return Err(CoordinatorError::NodeExists(path.to_string()));
        }
        inner.nodes.insert(
            path.to_string(),
            NodeData {
                payload: data.to_vec(),
                ephemeral,
            },
        );
        if let Some(watchers) = inner.data_watchers.get(path) {
            for w in watchers {
                let _ = w.try_send(DataEvent::Updated(data.to_vec()));
            }
        }
        Self::notify_children_change(&mut inner, path);
        Ok(())
    }

    async fn set_data(&self, path: &str, data: &[u8]) -> Result<(), CoordinatorError> {
        let mut inner = self.inner.lock();
        inner.nodes.insert(
            path.to_string(),
            NodeData {
                payload: data.to_vec(),
                ephemeral: false,
            },
        );
        if let Some(watchers) = inner.data_watchers.get(path) {
            for w in watchers {
                let _ = w.try_send(DataEvent::Updated(data.to_vec()));
            }
        }
        Self::notify_children_change(&mut inner, path);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), CoordinatorError> {
        let mut inner = self.inner.lock();
        if inner.nodes.remove(path).is_none() {
            return Err(CoordinatorError::NoNode(path.to_string()));
        }
        if let Some(watchers) = inner.data_watchers.get(path) {
            for w in watchers {
                let _ = w.try_send(DataEvent::Deleted);
            }
        }
        Self::notify_children_change(&mut inner, path);
        Ok(())
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, CoordinatorError> {
        let inner = self.inner.lock();
        Ok(Self::children_of(&inner.nodes, path))
    }

    async fn watch_data(&self, path: &str) -> Result<mpsc::Receiver<DataEvent>, CoordinatorError> {
        let (tx, rx) = mpsc::channel(32);
        self.inner
            .lock()
            .data_watchers
            .entry(path.to_string())
            .or_default()
            .push(tx);
        Ok(rx)
    }

    async fn watch_children(
        &self,
        path: &str,
    ) -> Result<mpsc::Receiver<ChildrenEvent>, CoordinatorError> {
        let (tx, rx) = mpsc::channel(32);
        let initial = {
            let mut inner = self.inner.lock();
            inner
                .children_watchers
                .entry(path.to_string())
                .or_default()
                .push(tx.clone());
            Self::children_of(&inner.nodes, path)
        };
        let _ = tx.try_send(ChildrenEvent::Updated(initial));
        Ok(rx)
    }

    fn session_state(&self) -> SessionState {
        self.inner.lock().session
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
