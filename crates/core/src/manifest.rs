// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest: the scheduler's description of one assigned instance.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub command: String,
}

/// Persisted as a text document at `cache/<instance-name>`.
///
/// `services` must be non-empty; `task` is filled in by the event daemon
/// from the instance name (never read from the coordinator's copy).
/// `extra` carries whatever additional placement metadata the coordinator
/// merged in and that this crate doesn't model explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub services: Vec<ServiceSpec>,
    #[serde(default)]
    pub task: String,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Manifest {
    pub fn validate(&self, instance: &str) -> Result<(), CoreError> {
        if self.services.is_empty() {
            return Err(CoreError::EmptyServices {
                instance: instance.to_string(),
            });
        }
        Ok(())
    }

    /// The first service; the one the config manager starts and whose
    /// name appears in `service_running`/`service_exited` event data.
    pub fn primary_service(&self) -> Option<&ServiceSpec> {
        self.services.first()
    }

    pub fn merge_placement(&mut self, placement: BTreeMap<String, toml::Value>) {
        for (k, v) in placement {
            self.extra.insert(k, v);
        }
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(s: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
