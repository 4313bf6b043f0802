// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`ContainerRuntime`] for component tests. Tests drive exit
//! behaviour with [`FakeRuntime::set_exit_code`] to simulate the
//! container runtime observing a container exit.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::{ContainerRuntime, ContainerSpec, ExitSets, RuntimeError};

struct FakeContainer {
    #[allow(dead_code)]
    spec: ContainerSpec,
    started: bool,
    exit_code: Option<i64>,
}

#[derive(Default)]
pub struct FakeRuntime {
    containers: Mutex<HashMap<String, FakeContainer>>,
    next_id: Mutex<u64>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_exit_code(&self, container_id: &str, code: i64) {
        if let Some(c) = self.containers.lock().get_mut(container_id) {
            c.exit_code = Some(code);
        }
    }

    pub fn is_started(&self, container_id: &str) -> bool {
        self.containers
            .lock()
            .get(container_id)
            .map(|c| c.started)
            .unwrap_or(false)
    }

    pub fn exists_sync(&self, container_id: &str) -> bool {
        self.containers.lock().contains_key(container_id)
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn create(&self, spec: &ContainerSpec) -> Result<String, RuntimeError> {
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let id = format!("fake-{next_id}");
        self.containers.lock().insert(
            id.clone(),
            FakeContainer {
                spec: spec.clone(),
                started: false,
                exit_code: None,
            },
        );
        Ok(id)
    }

    async fn exists(&self, container_id: &str) -> Result<bool, RuntimeError> {
        Ok(self.containers.lock().contains_key(container_id))
    }

    async fn start(&self, container_id: &str) -> Result<(), RuntimeError> {
        let mut containers = self.containers.lock();
        let c = containers
            .get_mut(container_id)
            .ok_or_else(|| RuntimeError::NotFound(container_id.to_string()))?;
        c.started = true;
        Ok(())
    }

    async fn kill(&self, container_id: &str) -> Result<(), RuntimeError> {
        let mut containers = self.containers.lock();
        let c = containers
            .get_mut(container_id)
            .ok_or_else(|| RuntimeError::NotFound(container_id.to_string()))?;
        c.exit_code = Some(137);
        Ok(())
    }

    async fn remove(&self, container_id: &str) -> Result<(), RuntimeError> {
        self.containers
            .lock()
            .remove(container_id)
            .map(|_| ())
            .ok_or_else(|| RuntimeError::NotFound(container_id.to_string()))
    }

    async fn exit_sets(&self) -> Result<ExitSets, RuntimeError> {
        let mut sets = ExitSets::default();
        for (id, c) in self.containers.lock().iter() {
            let Some(code) = c.exit_code else { continue };
            sets.exited.insert(id.clone());
            match code {
                0 => {
                    sets.finished.insert(id.clone());
                }
                137 => {
                    sets.killed.insert(id.clone());
                }
                c if (1..=255).contains(&c) => {
                    sets.aborted.insert(id.clone(), c as u16);
                }
                _ => {}
            }
        }
        Ok(sets)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
