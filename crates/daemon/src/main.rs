// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node agent entry point: builds the coordinator and container runtime
//! adapters from the environment and runs the watchdog in the
//! foreground until interrupted.

use std::sync::Arc;

use nodeward_adapters::{DockerRuntime, EtcdCoordinator};
use nodeward_core::{SystemClock, ZeroResourceSampler};
use nodeward_daemon::{NodeEnv, Watchdog};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = NodeEnv::from_env()?;

    let _log_guard = init_logging(&env)?;

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

fn init_logging(
    env: &NodeEnv,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    let file_appender = tracing_appender::rolling::daily(env.log_dir(), "nodeward-daemon.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .init();
    Ok(guard)
}
