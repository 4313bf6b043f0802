// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registrar (§4.2): maintains `/servers/<host>` and the ephemeral
//! `/server.presence/<host>`, gated by the node-available signal and the
//! `/blackedout.servers/<host>` read-only gate.

use std::sync::Arc;
use std::time::Duration;

use nodeward_adapters::{Coordinator, SessionState};
use nodeward_core::{NodeDescriptor, ResourceSampler};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::env::NodeEnv;
use crate::error::DaemonError;
use crate::screen::node_available;

fn registrar_tick() -> Duration {
    Duration::from_millis(
        std::env::var("NODEWARD_REGISTRAR_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5_000),
    )
}

pub async fn run(
    coordinator: Arc<dyn Coordinator>,
    env: NodeEnv,
    sampler: Arc<dyn ResourceSampler>,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(registrar_tick()) => {}
            _ = stop.changed() => {
                if *stop.borrow() {
                    return Ok(());
                }
            }
        }

        if let Err(e) = tick(&coordinator, &env, sampler.as_ref()).await {
            warn!(error = %e, "registrar tick failed; will retry");
        }

        if *stop.borrow() {
            return Ok(());
        }
    }
}

async fn tick(
    coordinator: &Arc<dyn Coordinator>,
    env: &NodeEnv,
    sampler: &dyn ResourceSampler,
) -> Result<(), DaemonError> {
    let presence_path = nodeward_core::paths::server_presence(&env.host);
    let available = node_available(&env.screen_state_path())
        && coordinator.session_state() == SessionState::Connected;
    let blacked_out = coordinator
        .exists(&nodeward_core::paths::blackout(&env.host))
        .await?;

    if available && !blacked_out {
        ensure_registered(coordinator, env, sampler, &presence_path).await?;
    } else {
        remove_presence(coordinator, &presence_path).await?;
    }
    Ok(())
}

async fn ensure_registered(
    coordinator: &Arc<dyn Coordinator>,
    env: &NodeEnv,
    sampler: &dyn ResourceSampler,
    presence_path: &str,
) -> Result<(), DaemonError> {
    let servers_path = nodeward_core::paths::servers(&env.host);
    let descriptor = build_descriptor(coordinator, sampler).await?;

    if !coordinator.exists(&servers_path).await? {
        if let Err(e) = coordinator
            .create(&servers_path, descriptor.as_str().as_bytes(), false)
            .await
        {
            warn!(error = %e, path = %servers_path, "failed to create server record; retrying next tick");
        }
    }

    if !coordinator.exists(presence_path).await? {
        match coordinator
            .create(presence_path, descriptor.as_str().as_bytes(), true)
            .await
        {
            Ok(()) => info!(host = %env.host, "presence registered"),
            Err(e) => warn!(error = %e, path = %presence_path, "failed to create presence node; retrying next tick"),
        }
    }
    Ok(())
}

/// Reading the descriptor template is fatal for this loop: returning
/// `Err` here terminates the registrar task so the watchdog restarts it.
async fn build_descriptor(
    coordinator: &Arc<dyn Coordinator>,
    sampler: &dyn ResourceSampler,
) -> Result<NodeDescriptor, DaemonError> {
    let template_path = nodeward_core::paths::server_node_template();
    let node = coordinator.get(&template_path).await?;
    let template = String::from_utf8_lossy(&node.payload);
    Ok(NodeDescriptor::build(&template, sampler.sample()))
}

async fn remove_presence(
    coordinator: &Arc<dyn Coordinator>,
    presence_path: &str,
) -> Result<(), DaemonError> {
    match coordinator.delete(presence_path).await {
        Ok(()) => Ok(()),
        Err(nodeward_adapters::CoordinatorError::NoNode(_)) => Ok(()),
        Err(e) => {
            warn!(error = %e, path = %presence_path, "failed to remove presence node; retrying next tick");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "registrar_tests.rs"]
mod tests;
