// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_then_get_round_trips() {
    let coord = FakeCoordinator::new();
    coord.create("/servers/h1", b"descriptor", false).await.unwrap();
    let node = coord.get("/servers/h1").await.unwrap();
    assert_eq!(node.payload, b"descriptor");
    assert!(!node.ephemeral);
}

#[tokio::test]
async fn create_twice_is_node_exists() {
    let coord = FakeCoordinator::new();
    coord.create("/servers/h1", b"a", false).await.unwrap();
    let err = coord.create("/servers/h1", b"b", false).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::NodeExists(_)));
}

#[tokio::test]
async fn delete_missing_is_no_node() {
    let coord = FakeCoordinator::new();
    let err = coord.delete("/servers/h1").await.unwrap_err();
    assert!(matches!(err, CoordinatorError::NoNode(_)));
}

#[tokio::test]
async fn children_lists_direct_descendants_only() {
    let coord = FakeCoordinator::new();
    coord.create("/placement/h1/appA#001", b"", false).await.unwrap();
    coord.create("/placement/h1/appA#002", b"", false).await.unwrap();
    let mut children = coord.children("/placement/h1").await.unwrap();
    children.sort();
    assert_eq!(children, vec!["appA#001".to_string(), "appA#002".to_string()]);
}

#[tokio::test]
async fn watch_children_sees_subsequent_additions() {
    let coord = FakeCoordinator::new();
    let mut rx = coord.watch_children("/placement/h1").await.unwrap();
    let first = rx.recv().await.unwrap();
    assert!(matches!(first, ChildrenEvent::Updated(ref v) if v.is_empty()));

    coord.create("/placement/h1/appA#001", b"", false).await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(matches!(second, ChildrenEvent::Updated(ref v) if v == &["appA#001".to_string()]));
}

#[tokio::test]
async fn watch_data_sees_delete() {
    let coord = FakeCoordinator::new();
    coord.create("/server.presence/h1", b"x", true).await.unwrap();
    let mut rx = coord.watch_data("/server.presence/h1").await.unwrap();
    coord.delete("/server.presence/h1").await.unwrap();
    let event = rx.recv().await.unwrap();
    assert!(matches!(event, DataEvent::Deleted));
}

#[test]
fn session_state_defaults_to_connected() {
    let coord = FakeCoordinator::new();
    assert_eq!(coord.session_state(), SessionState::Connected);
    coord.set_session_state(SessionState::Lost);
    assert_eq!(coord.session_state(), SessionState::Lost);
}
