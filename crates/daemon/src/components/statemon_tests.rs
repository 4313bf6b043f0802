// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nodeward_adapters::{ContainerSpec, FakeRuntime};
use nodeward_core::{FakeClock, Manifest, ServiceSpec};
use tempfile::tempdir;

fn env(root: &std::path::Path) -> NodeEnv {
    NodeEnv {
        root: root.to_path_buf(),
        host: "h1".to_string(),
        coordinator_endpoint: "localhost:2181".to_string(),
    }
}

async fn seed_running(env: &NodeEnv, runtime: &FakeRuntime, instance: &str) -> String {
    let manifest = Manifest {
        services: vec![ServiceSpec {
            name: "web".to_string(),
            command: "run.sh".to_string(),
        }],
        task: String::new(),
        extra: Default::default(),
    };
    nodeward_core::atomic::atomic_write(
        &env.cache_dir(),
        instance,
        manifest.to_toml().unwrap().as_bytes(),
    )
    .unwrap();

    let container_id = runtime
        .create(&ContainerSpec {
            image: "web".to_string(),
            command: "run.sh".to_string(),
        })
        .await
        .unwrap();
    nodeward_core::atomic::atomic_write(
        &env.running_dir(),
        instance,
        RunningMarker::new(container_id.clone())
            .to_toml()
            .unwrap()
            .as_bytes(),
    )
    .unwrap();
    container_id
}

fn events(env: &NodeEnv) -> Vec<String> {
    nodeward_core::atomic::list_instance_files(&env.appevents_dir()).unwrap()
}

#[tokio::test]
async fn finished_exit_emits_service_exited_then_finished() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();
    let runtime = FakeRuntime::new();
    let container_id = seed_running(&env, &runtime, "appA#001").await;
    runtime.set_exit_code(&container_id, 0);
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);
    let clock = FakeClock::new();

    scan(&runtime, &env, &clock).await.unwrap();

    let evs = events(&env);
    assert!(evs.iter().any(|e| e.contains(",service_exited,") && e.ends_with(".0.0")));
    assert!(evs.iter().any(|e| e.contains(",finished,0.0")));
    assert!(env.cleanup_dir().join("appA#001").exists());
}

#[tokio::test]
async fn killed_exit_emits_killed_with_empty_data() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();
    let runtime = FakeRuntime::new();
    let container_id = seed_running(&env, &runtime, "appB#002").await;
    runtime.set_exit_code(&container_id, 137);
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);
    let clock = FakeClock::new();

    scan(&runtime, &env, &clock).await.unwrap();

    let evs = events(&env);
    assert!(evs.iter().any(|e| e.contains(",killed,") && e.ends_with(",killed,")));
}

#[tokio::test]
async fn aborted_exit_reuses_rc_as_signal() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();
    let runtime = FakeRuntime::new();
    let container_id = seed_running(&env, &runtime, "appC#003").await;
    runtime.set_exit_code(&container_id, 2);
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);
    let clock = FakeClock::new();

    scan(&runtime, &env, &clock).await.unwrap();

    let evs = events(&env);
    assert!(evs.iter().any(|e| e.contains(",service_exited,") && e.ends_with(".2.2")));
    assert!(evs.iter().any(|e| e.contains(",aborted,2")));
}

#[tokio::test]
async fn already_cleaned_instance_is_skipped() {
    let dir = tempdir().unwrap();
    let env = env(dir.path());
    env.ensure_directories().unwrap();
    let runtime = FakeRuntime::new();
    let container_id = seed_running(&env, &runtime, "appD#004").await;
    runtime.set_exit_code(&container_id, 0);
    nodeward_core::atomic::atomic_write(&env.cleanup_dir(), "appD#004", b"").unwrap();
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(runtime);
    let clock = FakeClock::new();

    scan(&runtime, &env, &clock).await.unwrap();

    assert!(events(&env).is_empty());
}
