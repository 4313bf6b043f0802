// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for the node environment and component supervision.
//! Matches §7: fatal configuration errors terminate a component so the
//! watchdog restarts it; everything else is swallowed at the component's
//! top loop and logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("missing required environment variable {0:?}")]
    MissingEnvVar(&'static str),

    #[error("io error at {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("coordinator error: {0}")]
    Coordinator(#[from] nodeward_adapters::CoordinatorError),

    #[error("container runtime error: {0}")]
    Runtime(#[from] nodeward_adapters::RuntimeError),

    #[error("core data model error: {0}")]
    Core(#[from] nodeward_core::CoreError),

    #[error("a managed component did not stop within its graceful-stop budget")]
    StopTimedOut,
}
