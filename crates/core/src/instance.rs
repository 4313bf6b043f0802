// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance names: the primary key of the placement-to-execution pipeline.

use std::borrow::Borrow;
use std::fmt;

/// `<app>#<task>`. `task` is everything after the first `#`, or empty when
/// there is no `#` in the name. The full string is used verbatim as a
/// filename in every pipeline directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The substring before the first `#`, or the whole name if absent.
    pub fn app(&self) -> &str {
        match self.0.split_once('#') {
            Some((app, _)) => app,
            None => &self.0,
        }
    }

    /// The substring after the first `#`, or empty if absent.
    pub fn task(&self) -> &str {
        match self.0.split_once('#') {
            Some((_, task)) => task,
            None => "",
        }
    }

    /// A filename beginning with `.` is never an instance (`.seen` and
    /// any `.tmp*` sibling included).
    pub fn is_instance_filename(name: &str) -> bool {
        !name.starts_with('.')
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstanceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstanceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for InstanceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InstanceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
