// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watchdog (§4.8): supervises the six pipeline components as managed
//! tasks, starting them while the node is available and the coordinator
//! session is connected, and stopping them (plus the ephemeral presence
//! node) otherwise.

use std::sync::Arc;

use nodeward_adapters::{Coordinator, ContainerRuntime, SessionState};
use nodeward_core::{Clock, ResourceSampler};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::components::{cfgmgr, cleanup, eventd, publisher, registrar, statemon};
use crate::env::{graceful_stop_budget, watchdog_tick, NodeEnv};
use crate::error::DaemonError;
use crate::screen::node_available;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
}

struct Child {
    name: &'static str,
    status: ChildStatus,
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<Result<(), DaemonError>>>,
}

impl Child {
    fn idle(name: &'static str) -> Self {
        Self {
            name,
            status: ChildStatus::Stopped,
            stop_tx: None,
            handle: None,
        }
    }

    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

/// Supervises the six managed components plus a non-managed
/// screen-state-monitor placeholder entry that mirrors the source's
/// watchdog child table without taking on the real OS screen-lock pump.
pub struct Watchdog<C: Clock + 'static> {
    coordinator: Arc<dyn Coordinator>,
    runtime: Arc<dyn ContainerRuntime>,
    sampler: Arc<dyn ResourceSampler>,
    env: NodeEnv,
    clock: C,
    children: Vec<Child>,
}

const SCREEN_STATE_MONITOR: &str = "screen-state-monitor";

impl<C: Clock + 'static> Watchdog<C> {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        runtime: Arc<dyn ContainerRuntime>,
        sampler: Arc<dyn ResourceSampler>,
        env: NodeEnv,
        clock: C,
    ) -> Self {
        Self {
            coordinator,
            runtime,
            sampler,
            env,
            clock,
            children: vec![
                Child::idle("registrar"),
                Child::idle("eventd"),
                Child::idle("cfgmgr"),
                Child::idle("statemon"),
                Child::idle("publisher"),
                Child::idle("cleanup"),
            ],
        }
    }

    pub fn statuses(&self) -> Vec<(&'static str, ChildStatus)> {
        let mut v: Vec<(&'static str, ChildStatus)> =
            self.children.iter().map(|c| (c.name, c.status)).collect();
        v.push((SCREEN_STATE_MONITOR, ChildStatus::Running));
        v
    }

    /// Runs until `stop` fires. Consumes the watchdog.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<(), DaemonError> {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(watchdog_tick()) => {}
                _ = stop.changed() => {
                    if *stop.borrow() {
                        self.stop_all().await;
                        return Ok(());
                    }
                }
            }

            let available = node_available(&self.env.screen_state_path())
                && self.coordinator.session_state() == SessionState::Connected;

            if available {
                if self.children.iter().any(|c| c.status == ChildStatus::Running && !c.is_running()) {
                    warn!("a managed component exited unexpectedly; stopping all and re-registering");
                    self.stop_all().await;
                    self.remove_presence().await;
                } else {
                    self.start_all();
                }
            } else {
                self.stop_all().await;
                self.remove_presence().await;
            }

            if *stop.borrow() {
                self.stop_all().await;
                return Ok(());
            }
        }
    }

    fn start_all(&mut self) {
        for idx in 0..self.children.len() {
            if self.children[idx].status == ChildStatus::Stopped {
                self.start_one(idx);
            }
        }
    }

    fn start_one(&mut self, idx: usize) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let name = self.children[idx].name;
        let handle = match name {
            "registrar" => tokio::spawn(registrar::run(
                self.coordinator.clone(),
                self.env.clone(),
                self.sampler.clone(),
                stop_rx,
            )),
            "eventd" => tokio::spawn(eventd::run(
                self.coordinator.clone(),
                self.runtime.clone(),
                self.env.clone(),
                stop_rx,
            )),
            "cfgmgr" => tokio::spawn(cfgmgr::run(
                self.runtime.clone(),
                self.env.clone(),
                self.clock.clone(),
                stop_rx,
            )),
            "statemon" => tokio::spawn(statemon::run(
                self.runtime.clone(),
                self.env.clone(),
                self.clock.clone(),
                stop_rx,
            )),
            "publisher" => tokio::spawn(publisher::run(
                self.coordinator.clone(),
                self.env.clone(),
                stop_rx,
            )),
            "cleanup" => tokio::spawn(cleanup::run(
                self.coordinator.clone(),
                self.runtime.clone(),
                self.env.clone(),
                stop_rx,
            )),
            other => unreachable!("unknown managed component {other}"),
        };
        info!(component = name, "started");
        self.children[idx].stop_tx = Some(stop_tx);
        self.children[idx].handle = Some(handle);
        self.children[idx].status = ChildStatus::Running;
    }

    async fn stop_all(&mut self) {
        for child in &mut self.children {
            if child.status != ChildStatus::Running {
                continue;
            }
            child.status = ChildStatus::Stopping;
            if let Some(tx) = child.stop_tx.take() {
                let _ = tx.send(true);
            }
        }
        let budget = graceful_stop_budget();
        for child in &mut self.children {
            if let Some(handle) = child.handle.take() {
                match tokio::time::timeout(budget, handle).await {
                    Ok(_) => {}
                    Err(_) => warn!(component = child.name, "did not stop within its graceful-stop budget"),
                }
            }
            child.status = ChildStatus::Stopped;
        }
    }

    async fn remove_presence(&self) {
        let path = nodeward_core::paths::server_presence(&self.env.host);
        match self.coordinator.delete(&path).await {
            Ok(()) | Err(nodeward_adapters::CoordinatorError::NoNode(_)) => {}
            Err(e) => warn!(error = %e, "failed to remove presence node while stopping children"),
        }
    }
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
