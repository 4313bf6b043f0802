// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event daemon (§4.3): placement mirror. Subscribes to this node's
//! presence record and mirrors `/placement/<host>` into `cache/`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use nodeward_adapters::{ChildrenEvent, Coordinator, ContainerRuntime, DataEvent};
use nodeward_core::{InstanceName, Manifest, RunningMarker};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::env::NodeEnv;
use crate::error::DaemonError;

pub async fn run(
    coordinator: Arc<dyn Coordinator>,
    runtime: Arc<dyn ContainerRuntime>,
    env: NodeEnv,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    let presence_path = nodeward_core::paths::server_presence(&env.host);
    let placement_root = nodeward_core::paths::placement_root(&env.host);

    if coordinator.exists(&presence_path).await? {
        if let Err(e) = synchronize(&coordinator, &runtime, &env).await {
            warn!(error = %e, "initial placement sync failed; will retry on next event");
        }
    }

    let mut presence_rx = coordinator.watch_data(&presence_path).await?;
    // The placement list itself is watched too: the presence node only
    // flips on session churn, but an unschedule must be picked up as
    // soon as the coordinator's child list for this host changes.
    let mut placement_rx = coordinator.watch_children(&placement_root).await?;

    loop {
        tokio::select! {
            event = presence_rx.recv() => {
                match event {
                    Some(DataEvent::Updated(_)) => {
                        if let Err(e) = synchronize(&coordinator, &runtime, &env).await {
                            warn!(error = %e, "placement sync failed; will retry next event");
                        }
                    }
                    Some(DataEvent::Deleted) | None => {
                        let _ = nodeward_core::atomic::clear_seen(&env.cache_dir());
                    }
                }
            }
            event = placement_rx.recv() => {
                if let Some(ChildrenEvent::Updated(_)) = event {
                    if coordinator.exists(&presence_path).await.unwrap_or(false) {
                        if let Err(e) = synchronize(&coordinator, &runtime, &env).await {
                            warn!(error = %e, "placement sync failed; will retry next event");
                        }
                    }
                }
            }
            _ = stop.changed() => {
                if *stop.borrow() {
                    return Ok(());
                }
            }
        }
        if *stop.borrow() {
            return Ok(());
        }
    }
}

async fn synchronize(
    coordinator: &Arc<dyn Coordinator>,
    runtime: &Arc<dyn ContainerRuntime>,
    env: &NodeEnv,
) -> Result<(), DaemonError> {
    let placement_root = nodeward_core::paths::placement_root(&env.host);
    let expected: HashSet<String> = coordinator
        .children(&placement_root)
        .await?
        .into_iter()
        .collect();

    let cached: HashSet<String> = nodeward_core::atomic::list_instance_files(&env.cache_dir())?
        .into_iter()
        .collect();

    for extra in cached.difference(&expected) {
        remove_extra(runtime, env, extra).await;
    }

    for missing in expected.difference(&cached) {
        if let Err(e) = adopt_missing(coordinator, env, missing).await {
            warn!(error = %e, instance = %missing, "failed to cache new placement; will retry next sync");
        }
    }

    nodeward_core::atomic::ensure_seen(&env.cache_dir())?;
    Ok(())
}

/// Best-effort: an unschedule must not get stuck behind a runtime that
/// refuses to kill. The state monitor will eventually observe the exit
/// regardless of whether this kill succeeded.
async fn remove_extra(runtime: &Arc<dyn ContainerRuntime>, env: &NodeEnv, instance: &str) {
    let running_path = env.running_dir().join(instance);
    if let Ok(contents) = std::fs::read_to_string(&running_path) {
        if let Ok(marker) = RunningMarker::from_toml(&contents) {
            if let Err(e) = runtime.kill(&marker.container_id).await {
                warn!(error = %e, instance, "best-effort kill of unscheduled instance failed");
            }
        }
    }
    if let Err(e) = nodeward_core::atomic::remove_if_present(&env.cache_dir().join(instance)) {
        warn!(error = %e, instance, "failed to remove cache entry for unscheduled instance");
    }
}

async fn adopt_missing(
    coordinator: &Arc<dyn Coordinator>,
    env: &NodeEnv,
    instance: &str,
) -> Result<(), DaemonError> {
    let scheduled_path = nodeward_core::paths::scheduled(instance);
    let node = coordinator.get(&scheduled_path).await?;
    let mut manifest = Manifest::from_toml(&String::from_utf8_lossy(&node.payload))?;
    manifest.task = InstanceName::new(instance).task().to_string();

    let placement_path = nodeward_core::paths::placement(&env.host, instance);
    if let Ok(placement_node) = coordinator.get(&placement_path).await {
        if let Ok(extra) =
            toml::from_str::<BTreeMap<String, toml::Value>>(&String::from_utf8_lossy(&placement_node.payload))
        {
            manifest.merge_placement(extra);
        }
    }

    manifest.validate(instance)?;
    nodeward_core::atomic::atomic_write(
        &env.cache_dir(),
        instance,
        manifest.to_toml()?.as_bytes(),
    )?;
    info!(instance, "cached new placement");
    Ok(())
}

#[cfg(test)]
#[path = "eventd_tests.rs"]
mod tests;
