// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide configuration: the node environment (§10.3). Built once
//! at process start and passed by value into every component, replacing
//! the source's module-level globals.

use std::path::{Path, PathBuf};

use crate::error::DaemonError;

/// One root directory plus the four pipeline subdirectories and the log
/// directory, all ensured to exist at startup.
#[derive(Debug, Clone)]
pub struct NodeEnv {
    pub root: PathBuf,
    pub host: String,
    pub coordinator_endpoint: String,
}

impl NodeEnv {
    /// Reads `workDirectory` and `zookeeper` from the environment; both
    /// are required and their absence is a fatal configuration error.
    pub fn from_env() -> Result<Self, DaemonError> {
        let root = std::env::var("workDirectory")
            .map_err(|_| DaemonError::MissingEnvVar("workDirectory"))?;
        let coordinator_endpoint = std::env::var("zookeeper")
            .map_err(|_| DaemonError::MissingEnvVar("zookeeper"))?;
        let host = hostname();
        let env = Self {
            root: PathBuf::from(root),
            host,
            coordinator_endpoint,
        };
        env.ensure_directories()?;
        Ok(env)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn running_dir(&self) -> PathBuf {
        self.root.join("running")
    }

    pub fn cleanup_dir(&self) -> PathBuf {
        self.root.join("cleanup")
    }

    pub fn appevents_dir(&self) -> PathBuf {
        self.root.join("appevents")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("log")
    }

    pub fn screen_state_path(&self) -> PathBuf {
        self.root.join("screen_state.txt")
    }

    pub fn installed_version_path(&self) -> PathBuf {
        self.root.join("installed_version.txt")
    }

    pub fn ensure_directories(&self) -> Result<(), DaemonError> {
        for dir in [
            self.cache_dir(),
            self.running_dir(),
            self.cleanup_dir(),
            self.appevents_dir(),
            self.log_dir(),
        ] {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), DaemonError> {
    std::fs::create_dir_all(path).map_err(|source| DaemonError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn hostname() -> String {
    std::env::var("NODEWARD_HOST").unwrap_or_else(|_| {
        nix::unistd::gethostname()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string())
    })
}

/// Default heartbeat intervals (§5).
pub fn config_manager_heartbeat() -> std::time::Duration {
    std::time::Duration::from_millis(
        std::env::var("NODEWARD_CFGMGR_HEARTBEAT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30_000),
    )
}

pub fn state_monitor_interval() -> std::time::Duration {
    std::time::Duration::from_millis(
        std::env::var("NODEWARD_STATEMON_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1_000),
    )
}

pub fn cleanup_worker_interval() -> std::time::Duration {
    std::time::Duration::from_millis(
        std::env::var("NODEWARD_CLEANUP_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2_000),
    )
}

pub fn watchdog_tick() -> std::time::Duration {
    std::time::Duration::from_millis(
        std::env::var("NODEWARD_WATCHDOG_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1_000),
    )
}

pub fn graceful_stop_budget() -> std::time::Duration {
    std::time::Duration::from_millis(
        std::env::var("NODEWARD_STOP_BUDGET_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10_000),
    )
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
