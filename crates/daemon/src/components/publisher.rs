// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event publisher (§4.6): forwards `appevents/` to the coordinator's
//! task log and unschedules instances on terminal events.

use std::path::Path;
use std::sync::Arc;

use nodeward_adapters::{Coordinator, CoordinatorError};
use nodeward_core::EventFile;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::env::NodeEnv;
use crate::error::DaemonError;

#[derive(Serialize)]
struct TaskSummary<'a> {
    state: &'a str,
    when: u64,
    host: &'a str,
    data: String,
}

pub async fn run(
    coordinator: Arc<dyn Coordinator>,
    env: NodeEnv,
    mut stop: watch::Receiver<bool>,
) -> Result<(), DaemonError> {
    let (tx, mut watch_rx) = mpsc::channel(32);
    let _watcher_guard = create_dir_watcher(&env.appevents_dir(), tx);

    publish_all(&coordinator, &env).await;

    loop {
        tokio::select! {
            _ = watch_rx.recv() => {
                publish_all(&coordinator, &env).await;
            }
            _ = tokio::time::sleep(std::time::Duration::from_secs(2)) => {
                publish_all(&coordinator, &env).await;
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

async fn publish_all(coordinator: &Arc<dyn Coordinator>, env: &NodeEnv) {
    let names = match nodeward_core::atomic::list_instance_files(&env.appevents_dir()) {
        Ok(names) => names,
        Err(e) => {
            warn!(error = %e, "failed to list appevents directory");
            return;
        }
    };

    for name in names {
        if let Err(e) = publish_one(coordinator, env, &name).await {
            warn!(error = %e, file = name, "failed to publish event; left in place for retry");
        }
    }
}

async fn publish_one(
    coordinator: &Arc<dyn Coordinator>,
    env: &NodeEnv,
    name: &str,
) -> Result<(), DaemonError> {
    let path = env.appevents_dir().join(name);
    let payload = std::fs::read(&path).map_err(|source| DaemonError::Io {
        path: name.to_string(),
        source,
    })?;

    let parsed = match EventFile::parse(name) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, file = name, "malformed event filename; leaving for inspection");
            return Ok(());
        }
    };

    let app = parsed.instance.app().to_string();
    let event_name = format!(
        "{},{},{},{}",
        parsed.timestamp_ms,
        env.host,
        parsed.event.event_type().as_str(),
        parsed.event.encode_data()
    );
    let task_path = nodeward_core::paths::tasks_event(&app, &event_name);

    match coordinator.create(&task_path, &payload, false).await {
        Ok(()) | Err(CoordinatorError::NodeExists(_)) => {}
        Err(e) => return Err(e.into()),
    }

    if parsed.event.event_type().is_terminal() {
        let scheduled_path = nodeward_core::paths::scheduled(parsed.instance.as_str());
        match coordinator.delete(&scheduled_path).await {
            Ok(()) | Err(CoordinatorError::NoNode(_)) => {}
            Err(e) => warn!(error = %e, instance = %parsed.instance, "failed to delete scheduled record"),
        }

        let summary = TaskSummary {
            state: parsed.event.event_type().as_str(),
            when: parsed.timestamp_ms,
            host: &env.host,
            data: parsed.event.encode_data(),
        };
        if let Ok(body) = toml::to_string(&summary) {
            let app_path = nodeward_core::paths::tasks_app(&app);
            if let Err(e) = coordinator.set_data(&app_path, body.as_bytes()).await {
                warn!(error = %e, app, "best-effort task summary update failed");
            }
        }
    }

    nodeward_core::atomic::remove_if_present(&path)?;
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
            warn!(error = %e, "directory watcher unavailable; relying on poll");
            return None;
        }
    };

    match watcher.watch(path, RecursiveMode::NonRecursive) {
        Ok(()) => Some(watcher),
        Err(e) => {
            warn!(error = %e, "failed to watch appevents directory; relying on poll");
            None
        }
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
