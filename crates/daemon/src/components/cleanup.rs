// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleanup worker (§4.7): removes the container and erases the
//! placement record and markers once the state monitor has queued an
//! instance for cleanup.

use std::sync::Arc;

use nodeward_adapters::{Coordinator, ContainerRuntime, CoordinatorError, RuntimeError};
use nodeward_core::RunningMarker;
use tokio::sync::watch;
use tracing::warn;

use crate::env::{cleanup_worker_interval, NodeEnv};
use crate::error::DaemonError;
use crate::screen::node_available;

pub async fn run(
    coordinator: Arc<dyn Coordinator>,
    runtime: Arc<dyn ContainerRuntime>,
    env: NodeEnv,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(cleanup_worker_interval()) => {}
            _ = stop.changed() => {
                if *stop.borrow() {
                    return Ok(());
                }
            }
        }

        if node_available(&env.screen_state_path()) {
            sweep(&coordinator, &runtime, &env).await;
        }

        if *stop.borrow() {
            return Ok(());
        }
    }
}

async fn sweep(coordinator: &Arc<dyn Coordinator>, runtime: &Arc<dyn ContainerRuntime>, env: &NodeEnv) {
    let instances = match nodeward_core::atomic::list_instance_files(&env.cleanup_dir()) {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "failed to list cleanup directory");
            return;
        }
    };

    for instance in instances {
        if let Err(e) = cleanup_one(coordinator, runtime, env, &instance).await {
            warn!(error = %e, instance, "cleanup failed; entry retained for retry");
        }
    }
}

async fn cleanup_one(
    coordinator: &Arc<dyn Coordinator>,
    runtime: &Arc<dyn ContainerRuntime>,
    env: &NodeEnv,
    instance: &str,
) -> Result<(), DaemonError> {
    let placement_path = nodeward_core::paths::placement(&env.host, instance);
    match coordinator.delete(&placement_path).await {
        Ok(()) | Err(CoordinatorError::NoNode(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let marker_path = env.cleanup_dir().join(instance);
    let contents = std::fs::read_to_string(&marker_path).map_err(|source| DaemonError::Io {
        path: instance.to_string(),
        source,
    })?;
    let marker = RunningMarker::from_toml(&contents)?;

    match runtime.remove(&marker.container_id).await {
        Ok(()) | Err(RuntimeError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    nodeward_core::atomic::remove_if_present(&env.cache_dir().join(instance))?;
    nodeward_core::atomic::remove_if_present(&env.running_dir().join(instance))?;
    nodeward_core::atomic::remove_if_present(&marker_path)?;
    Ok(())
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
