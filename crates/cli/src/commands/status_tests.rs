// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn status_reports_not_installed_when_no_version_file() {
    let dir = tempdir().unwrap();
    std::env::set_var("workDirectory", dir.path());
    std::env::set_var("zookeeper", "localhost:2181");

    run(OutputFormat::Text).unwrap();

    std::env::remove_var("workDirectory");
    std::env::remove_var("zookeeper");
}

#[test]
#[serial]
fn status_counts_pipeline_backlog() {
    let dir = tempdir().unwrap();
    std::env::set_var("workDirectory", dir.path());
    std::env::set_var("zookeeper", "localhost:2181");

    let env = NodeEnv::from_env().unwrap();
    nodeward_core::atomic::atomic_write(&env.cache_dir(), "appA#001", b"").unwrap();
    nodeward_core::atomic::ensure_seen(&env.cache_dir()).unwrap();

    run(OutputFormat::Json).unwrap();

    std::env::remove_var("workDirectory");
    std::env::remove_var("zookeeper");
}
