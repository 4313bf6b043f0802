// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host descriptor text for `/servers/<host>` and `/server.presence/<host>`.

use std::fmt;

/// Prefixed onto the host descriptor as three lines, per the original
/// source's resource sampler. The sampler itself (CPU/disk/memory
/// measurement) is an external collaborator; this struct only fixes the
/// wire format other coordinator consumers parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceSample {
    pub cpu_pct: u32,
    pub disk_mb: u64,
    pub mem_mb: u64,
}

impl fmt::Display for ResourceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cpu: {}%", self.cpu_pct)?;
        writeln!(f, "disk: {}M", self.disk_mb)?;
        writeln!(f, "memory: {}M", self.mem_mb)
    }
}

/// Pluggable source of [`ResourceSample`]s. Real sampling is out of
/// scope for this crate; [`ZeroResourceSampler`] is the default used
/// when no real sampler is wired in.
pub trait ResourceSampler: Send + Sync {
    fn sample(&self) -> ResourceSample;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroResourceSampler;

impl ResourceSampler for ZeroResourceSampler {
    fn sample(&self) -> ResourceSample {
        ResourceSample::default()
    }
}

/// The registrar's `/servers/<host>` payload: a template descriptor with
/// the first `~` replaced by the literal label `windows` and the current
/// resource sample prepended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor(String);

impl NodeDescriptor {
    /// `template` is the raw text fetched from `/servers/node`.
    pub fn build(template: &str, resources: ResourceSample) -> Self {
        let labeled = replace_first(template, '~', "windows");
        Self(format!("{resources}{labeled}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn replace_first(s: &str, from: char, to: &str) -> String {
    match s.find(from) {
        Some(idx) => {
            let mut out = String::with_capacity(s.len() + to.len());
            out.push_str(&s[..idx]);
            out.push_str(to);
            out.push_str(&s[idx + from.len_utf8()..]);
            out
        }
        None => s.to_string(),
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
