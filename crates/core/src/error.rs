// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type shared by the data-model layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest for {instance} has no services")]
    EmptyServices { instance: String },

    #[error("malformed manifest for {instance}: {reason}")]
    MalformedManifest { instance: String, reason: String },

    #[error("malformed event filename {name:?}: {reason}")]
    MalformedEventFile { name: String, reason: String },

    #[error("malformed marker {path:?}: {reason}")]
    MalformedMarker { path: String, reason: String },

    #[error("io error at {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("toml decode error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("toml encode error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
