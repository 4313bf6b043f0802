// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nodeward_adapters::{ContainerSpec, FakeCoordinator, FakeRuntime};
use tempfile::tempdir;

fn env(root: &std::path::Path) -> NodeEnv {
    NodeEnv {
        root: root.to_path_buf(),
        host: "h1".to_string(),
        coordinator_endpoint: "localhost:2181".to_string(),
    }
}

#[tokio::test]
async fn removes_container_and_all_markers() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();

    let coordinator: Arc<dyn Coordinator> = Arc::new(FakeCoordinator::new());
    let runtime = FakeRuntime::new();
    let container_id = runtime
        .create(&ContainerSpec {
            image: "web".to_string(),
            command: "run.sh".to_string(),
        })
        .await
        .unwrap();
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);

    coordinator
        .create("/placement/h1/appA#001", b"x", false)
        .await
        .unwrap();
    for dir in [env.cache_dir(), env.running_dir(), env.cleanup_dir()] {
        nodeward_core::atomic::atomic_write(
            &dir,
            "appA#001",
            RunningMarker::new(container_id.clone()).to_toml().unwrap().as_bytes(),
        )
        .unwrap();
    }

    sweep(&coordinator, &runtime, &env).await;

    assert!(!coordinator.exists("/placement/h1/appA#001").await.unwrap());
    assert!(!env.cache_dir().join("appA#001").exists());
    assert!(!env.running_dir().join("appA#001").exists());
    assert!(!env.cleanup_dir().join("appA#001").exists());
}

#[tokio::test]
async fn missing_placement_record_is_not_an_error() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();

    let coordinator: Arc<dyn Coordinator> = Arc::new(FakeCoordinator::new());
    let runtime = FakeRuntime::new();
    let container_id = runtime
        .create(&ContainerSpec {
            image: "web".to_string(),
            command: "run.sh".to_string(),
        })
        .await
        .unwrap();
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);

    nodeward_core::atomic::atomic_write(
        &env.cleanup_dir(),
        "appB#002",
        RunningMarker::new(container_id).to_toml().unwrap().as_bytes(),
    )
    .unwrap();

    sweep(&coordinator, &runtime, &env).await;

    assert!(!env.cleanup_dir().join("appB#002").exists());
}
