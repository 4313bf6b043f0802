// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn spec() -> ContainerSpec {
    ContainerSpec {
        image: "resource".to_string(),
        command: "./run.sh".to_string(),
    }
}

#[tokio::test]
async fn create_then_start_marks_started() {
    let runtime = FakeRuntime::new();
    let id = runtime.create(&spec()).await.unwrap();
    assert!(runtime.exists(&id).await.unwrap());
    assert!(!runtime.is_started(&id));
    runtime.start(&id).await.unwrap();
    assert!(runtime.is_started(&id));
}

#[tokio::test]
async fn exit_sets_classifies_by_code() {
    let runtime = FakeRuntime::new();
    let finished = runtime.create(&spec()).await.unwrap();
    let killed = runtime.create(&spec()).await.unwrap();
    let aborted = runtime.create(&spec()).await.unwrap();
    runtime.set_exit_code(&finished, 0);
    runtime.set_exit_code(&killed, 137);
    runtime.set_exit_code(&aborted, 2);

    let sets = runtime.exit_sets().await.unwrap();
    assert!(sets.finished.contains(&finished));
    assert!(sets.killed.contains(&killed));
    assert_eq!(sets.aborted.get(&aborted), Some(&2));
    assert_eq!(sets.exited.len(), 3);
}

#[tokio::test]
async fn remove_then_exists_is_false() {
    let runtime = FakeRuntime::new();
    let id = runtime.create(&spec()).await.unwrap();
    runtime.remove(&id).await.unwrap();
    assert!(!runtime.exists(&id).await.unwrap());
}

#[tokio::test]
async fn kill_sets_exit_code_137() {
    let runtime = FakeRuntime::new();
    let id = runtime.create(&spec()).await.unwrap();
    runtime.kill(&id).await.unwrap();
    let sets = runtime.exit_sets().await.unwrap();
    assert!(sets.killed.contains(&id));
}
