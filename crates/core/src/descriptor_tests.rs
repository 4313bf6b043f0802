// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn resource_sample_formats_three_lines() {
    let sample = ResourceSample {
        cpu_pct: 12,
        disk_mb: 2048,
        mem_mb: 512,
    };
    assert_eq!(sample.to_string(), "cpu: 12%\ndisk: 2048M\nmemory: 512M\n");
}

#[test]
fn zero_sampler_returns_default() {
    let sampler = ZeroResourceSampler;
    assert_eq!(sampler.sample(), ResourceSample::default());
}

#[test]
fn descriptor_replaces_only_first_tilde() {
    let descriptor = NodeDescriptor::build("~host/~pool", ResourceSample::default());
    assert!(descriptor.as_str().ends_with("windows/~pool"));
}

#[test]
fn descriptor_prepends_resource_lines() {
    let sample = ResourceSample {
        cpu_pct: 5,
        disk_mb: 1,
        mem_mb: 1,
    };
    let descriptor = NodeDescriptor::build("~node-a", sample);
    assert!(descriptor.as_str().starts_with("cpu: 5%\n"));
    assert!(descriptor.as_str().contains("windows"));
}
