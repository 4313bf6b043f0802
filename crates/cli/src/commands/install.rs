// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nodeward install` (§6): creates the directory tree and records the
//! installed version. Registering the watchdog as an OS service is an
//! external collaborator's job (§1 Non-goals: "service supervisor
//! plumbing"); this command only prepares the filesystem state that a
//! service definition would then point at.

use nodeward_daemon::NodeEnv;

use crate::error::CliError;
use crate::output::{format_or_json, OutputFormat};

pub fn run(format: OutputFormat) -> Result<(), CliError> {
    let env = NodeEnv::from_env()?;
    let version = env!("CARGO_PKG_VERSION");

    std::fs::write(env.installed_version_path(), version).map_err(|source| CliError::Io {
        path: env.installed_version_path().display().to_string(),
        source,
    })?;

    let obj = serde_json::json!({
        "root": env.root.display().to_string(),
        "version": version,
    });
    format_or_json(format, &obj, || {
        println!("Installed nodeward {version} under {}", env.root.display());
        println!("Directory tree created; register the watchdog as a service separately.");
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
