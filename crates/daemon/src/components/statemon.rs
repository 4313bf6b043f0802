// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State monitor (§4.5): classifies container exits observed in
//! `running/` and emits the terminal event pair, then hands the
//! instance off to the cleanup worker via the cleanup marker.

use std::collections::HashMap;
use std::sync::Arc;

use nodeward_adapters::ContainerRuntime;
use nodeward_core::{Clock, EventFile, InstanceName, RunningMarker, TraceEvent};
use tokio::sync::watch;
use tracing::warn;

use crate::env::{state_monitor_interval, NodeEnv};
use crate::error::DaemonError;

pub async fn run<C: Clock + 'static>(
    runtime: Arc<dyn ContainerRuntime>,
    env: NodeEnv,
    clock: C,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(state_monitor_interval()) => {}
            _ = stop.changed() => {
                if *stop.borrow() {
                    return Ok(());
                }
            }
        }

        if let Err(e) = scan(&runtime, &env, &clock).await {
            warn!(error = %e, "state monitor scan failed; will retry next tick");
        }

        if *stop.borrow() {
            return Ok(());
        }
    }
}

async fn scan(
    runtime: &Arc<dyn ContainerRuntime>,
    env: &NodeEnv,
    clock: &impl Clock,
) -> Result<(), DaemonError> {
    let already_cleaned: std::collections::HashSet<String> =
        nodeward_core::atomic::list_instance_files(&env.cleanup_dir())?
            .into_iter()
            .collect();

    let mut by_container: HashMap<String, (String, RunningMarker)> = HashMap::new();
    for instance in nodeward_core::atomic::list_instance_files(&env.running_dir())? {
        if already_cleaned.contains(&instance) {
            continue;
        }
        let path = env.running_dir().join(&instance);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, instance, "failed to read running marker");
                continue;
            }
        };
        match RunningMarker::from_toml(&contents) {
            Ok(marker) => {
                by_container.insert(marker.container_id.clone(), (instance, marker));
            }
            Err(e) => warn!(error = %e, instance, "malformed running marker"),
        }
    }

    if by_container.is_empty() {
        return Ok(());
    }

    let exit_sets = runtime.exit_sets().await?;

    for (container_id, (instance, marker)) in &by_container {
        if !exit_sets.exited.contains(container_id) {
            continue;
        }
        let service = service_name(env, instance);
        let (exited, terminal) = if exit_sets.finished.contains(container_id) {
            (
                TraceEvent::ServiceExited {
                    container_id: container_id.clone(),
                    service: service.clone(),
                    rc: 0,
                    signal: 0,
                },
                TraceEvent::Finished { rc: 0, signal: 0 },
            )
        } else if exit_sets.killed.contains(container_id) {
            (
                TraceEvent::ServiceExited {
                    container_id: container_id.clone(),
                    service: service.clone(),
                    rc: 137,
                    signal: 137,
                },
                TraceEvent::Killed { is_oom: false },
            )
        } else if let Some(&rc) = exit_sets.aborted.get(container_id) {
            (
                TraceEvent::ServiceExited {
                    container_id: container_id.clone(),
                    service: service.clone(),
                    // Wire-compat quirk documented in the event codec:
                    // signal reuses rc for aborted exits.
                    rc,
                    signal: rc,
                },
                TraceEvent::Aborted {
                    reason: rc.to_string(),
                },
            )
        } else {
            continue;
        };

        emit(env, clock, instance, exited)?;
        emit(env, clock, instance, terminal)?;

        nodeward_core::atomic::atomic_copy(
            &env.running_dir().join(instance),
            &env.cleanup_dir(),
            instance,
        )?;
        let _ = marker;
    }

    Ok(())
}

fn service_name(env: &NodeEnv, instance: &str) -> String {
    std::fs::read_to_string(env.cache_dir().join(instance))
        .ok()
        .and_then(|text| nodeward_core::Manifest::from_toml(&text).ok())
        .and_then(|m| m.primary_service().map(|s| s.name.clone()))
        .unwrap_or_default()
}

fn emit(
    env: &NodeEnv,
    clock: &impl Clock,
    instance: &str,
    event: TraceEvent,
) -> Result<(), DaemonError> {
    let file = EventFile::new(clock.epoch_ms(), InstanceName::new(instance), event);
    nodeward_core::atomic::atomic_write(&env.appevents_dir(), &file.filename(), b"")?;
    Ok(())
}

#[cfg(test)]
#[path = "statemon_tests.rs"]
mod tests;
