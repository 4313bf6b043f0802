// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nodeward uninstall` (§6): version-checks against
//! `installed_version.txt` and then removes the directory tree. Removing
//! the OS service registration itself is delegated (§1 Non-goals).

use nodeward_daemon::NodeEnv;

use crate::error::CliError;
use crate::output::{format_or_json, OutputFormat};

pub fn run(force: bool, format: OutputFormat) -> Result<(), CliError> {
    let env = NodeEnv::from_env()?;
    let current = env!("CARGO_PKG_VERSION");
    let version_path = env.installed_version_path();

    if !force {
        let installed = std::fs::read_to_string(&version_path)
            .map_err(|_| CliError::NotInstalled(env.root.clone()))?;
        let installed = installed.trim();
        if installed != current {
            return Err(CliError::VersionMismatch {
                installed: installed.to_string(),
                current,
            });
        }
    }

    std::fs::remove_dir_all(&env.root).map_err(|source| CliError::Io {
        path: env.root.display().to_string(),
        source,
    })?;

    let obj = serde_json::json!({ "root": env.root.display().to_string() });
    format_or_json(format, &obj, || {
        println!("Removed {}", env.root.display());
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "uninstall_tests.rs"]
mod tests;
