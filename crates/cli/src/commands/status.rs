// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nodeward status` (§6): a diagnostic read of the directory layout —
//! installed version, whether the placement mirror has caught up at
//! least once (the `.seen` sentinel), and the size of each pipeline
//! queue. Does not talk to the coordinator or container runtime.

use nodeward_core::atomic::list_instance_files;
use nodeward_daemon::NodeEnv;

use crate::error::CliError;
use crate::output::{format_or_json, OutputFormat};

pub fn run(format: OutputFormat) -> Result<(), CliError> {
    let env = NodeEnv::from_env()?;

    let installed_version = std::fs::read_to_string(env.installed_version_path())
        .ok()
        .map(|s| s.trim().to_string());
    let seen = env.cache_dir().join(".seen").exists();
    let cached = list_instance_files(&env.cache_dir()).map_err(|e| CliError::Io {
        path: env.cache_dir().display().to_string(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let running = list_instance_files(&env.running_dir()).map_err(|e| CliError::Io {
        path: env.running_dir().display().to_string(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let pending_cleanup = list_instance_files(&env.cleanup_dir()).map_err(|e| CliError::Io {
        path: env.cleanup_dir().display().to_string(),
        source: std::io::Error::other(e.to_string()),
    })?;
    let unpublished_events =
        list_instance_files(&env.appevents_dir()).map_err(|e| CliError::Io {
            path: env.appevents_dir().display().to_string(),
            source: std::io::Error::other(e.to_string()),
        })?;

    let obj = serde_json::json!({
        "root": env.root.display().to_string(),
        "installed_version": installed_version,
        "placement_mirror_seen": seen,
        "cached_instances": cached.len(),
        "running_instances": running.len(),
        "pending_cleanup": pending_cleanup.len(),
        "unpublished_events": unpublished_events.len(),
    });

    format_or_json(format, &obj, || {
        println!("Root: {}", env.root.display());
        match &installed_version {
            Some(v) => println!("Installed version: {v}"),
            None => println!("Installed version: (not installed)"),
        }
        println!("Placement mirror caught up at least once: {seen}");
        println!("Cached instances: {}", cached.len());
        println!("Running instances: {}", running.len());
        println!("Pending cleanup: {}", pending_cleanup.len());
        println!("Unpublished events: {}", unpublished_events.len());
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
