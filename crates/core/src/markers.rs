// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running and cleanup markers.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// `running/<instance-name>`. Presence asserts this node started the
/// instance and is still responsible for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningMarker {
    pub container_id: String,
}

impl RunningMarker {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(s: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(s)?)
    }
}

/// `cleanup/<instance-name>`: a byte-for-byte copy of the running marker,
/// placed once the state monitor observes a terminal container state.
/// Presence asserts the instance requires cleanup.
pub type CleanupMarker = RunningMarker;

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
