// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config manager (§4.4): turns a cached manifest without a running
//! marker into a started container plus a running marker.

use std::path::Path;
use std::sync::Arc;

use nodeward_adapters::{ContainerRuntime, ContainerSpec};
use nodeward_core::{Clock, EventFile, InstanceName, Manifest, RunningMarker};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::env::{config_manager_heartbeat, NodeEnv};
use crate::error::DaemonError;

pub async fn run<C: Clock + 'static>(
    runtime: Arc<dyn ContainerRuntime>,
    env: NodeEnv,
    clock: C,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    let (tx, mut watch_rx) = mpsc::channel(32);
    let _watcher_guard = create_dir_watcher(&env.cache_dir(), tx);

    reconcile(&runtime, &env, &clock).await;

    loop {
        tokio::select! {
            _ = watch_rx.recv() => {
                reconcile(&runtime, &env, &clock).await;
            }
            _ = tokio::time::sleep(config_manager_heartbeat()) => {
                reconcile(&runtime, &env, &clock).await;
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

async fn reconcile(runtime: &Arc<dyn ContainerRuntime>, env: &NodeEnv, clock: &impl Clock) {
    let instances = match nodeward_core::atomic::list_instance_files(&env.cache_dir()) {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "failed to list cache directory");
            return;
        }
    };

    for instance in instances {
        if env.running_dir().join(&instance).exists() {
            continue;
        }
        if let Err(e) = configure(runtime, env, clock, &instance).await {
            warn!(error = %e, instance, "configure failed; will retry next pass");
        }
    }
}

async fn configure(
    runtime: &Arc<dyn ContainerRuntime>,
    env: &NodeEnv,
    clock: &impl Clock,
    instance: &str,
) -> Result<(), DaemonError> {
    let manifest_text = std::fs::read_to_string(env.cache_dir().join(instance)).map_err(|source| {
        DaemonError::Io {
            path: instance.to_string(),
            source,
        }
    })?;
    let manifest = Manifest::from_toml(&manifest_text)?;
    let service = manifest
        .primary_service()
        .ok_or_else(|| nodeward_core::CoreError::EmptyServices {
            instance: instance.to_string(),
        })?;

    let container_id = runtime
        .create(&ContainerSpec {
            image: service.name.clone(),
            command: service.command.clone(),
        })
        .await?;

    if runtime.exists(&container_id).await? {
        emit(env, clock, instance, nodeward_core::TraceEvent::Configured {
            container_id: container_id.clone(),
        })?;
    }

    if let Err(e) = runtime.start(&container_id).await {
        warn!(error = %e, instance, container_id, "start failed; abandoning this configure attempt");
        return Ok(());
    }

    nodeward_core::atomic::atomic_write(
        &env.running_dir(),
        instance,
        RunningMarker::new(container_id.clone()).to_toml()?.as_bytes(),
    )?;

    emit(
        env,
        clock,
        instance,
        nodeward_core::TraceEvent::ServiceRunning {
            container_id,
            service: service.name.clone(),
        },
    )?;
    info!(instance, "container started");
    Ok(())
}

fn emit(
    env: &NodeEnv,
    clock: &impl Clock,
    instance: &str,
    event: nodeward_core::TraceEvent,
) -> Result<(), DaemonError> {
    let file = EventFile::new(clock.epoch_ms(), InstanceName::new(instance), event);
    nodeward_core::atomic::atomic_write(&env.appevents_dir(), &file.filename(), b"")?;
    Ok(())
}

fn create_dir_watcher(path: &Path, tx: mpsc::Sender<()>) -> Option<RecommendedWatcher> {
    let mut watcher = match notify::recommended_watcher(move |res: Result<notify::Event, _>| {
        if res.is_ok() {
            let _ = tx.blocking_send(());
        }
    }) {
        Ok(w) => w,
        Err(e) => {
            warn!(error = %e, "directory watcher unavailable; relying on heartbeat scan");
            return None;
        }
    };

    match watcher.watch(path, RecursiveMode::NonRecursive) {
        Ok(()) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "failed to watch cache directory; relying on heartbeat scan");
            None
        }
    }
}

#[cfg(test)]
#[path = "cfgmgr_tests.rs"]
mod tests;
