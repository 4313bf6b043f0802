// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for the install/uninstall/status scripted steps (§6). Each
//! variant maps to a distinct non-zero exit code at the command boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("node environment error: {0}")]
    Env(#[from] nodeward_daemon::DaemonError),

    #[error("coordinator error: {0}")]
    Coordinator(#[from] nodeward_adapters::CoordinatorError),

    #[error("container runtime error: {0}")]
    Runtime(#[from] nodeward_adapters::RuntimeError),

    #[error("io error at {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "installed version {installed:?} does not match this binary's version {current:?}; refusing to uninstall"
    )]
    VersionMismatch { installed: String, current: &'static str },

    #[error("{0:?} is not installed (no installed_version.txt found)")]
    NotInstalled(std::path::PathBuf),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
