// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nodeward run` (§6): builds the real coordinator/runtime adapters and
//! runs the watchdog in the foreground until interrupted. Equivalent to
//! invoking `nodewardd` directly; kept here so operators have a single
//! entry point for install/uninstall/run/status.

use std::sync::Arc;

use nodeward_adapters::{DockerRuntime, EtcdCoordinator};
use nodeward_core::{SystemClock, ZeroResourceSampler};
use nodeward_daemon::{NodeEnv, Watchdog};
use tokio::sync::watch;

use crate::error::CliError;

pub async fn run() -> Result<(), CliError> {
    let env = NodeEnv::from_env()?;

    let coordinator = Arc::new(EtcdCoordinator::connect(&env.coordinator_endpoint).await?);
    let runtime = Arc::new(DockerRuntime::connect_local()?);
    let sampler = Arc::new(ZeroResourceSampler);

    let watchdog = Watchdog::new(coordinator, runtime, sampler, env, SystemClock);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = stop_tx.send(true);
    });

    watchdog.run(stop_rx).await?;
    Ok(())
}
