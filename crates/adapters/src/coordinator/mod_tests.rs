// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::fake::FakeCoordinator;
use super::*;

#[tokio::test]
async fn exists_reflects_create_and_delete() {
    let coord = FakeCoordinator::new();
    assert!(!coord.exists("/servers/h1").await.unwrap());
    coord.create("/servers/h1", b"d", false).await.unwrap();
    assert!(coord.exists("/servers/h1").await.unwrap());
    coord.delete("/servers/h1").await.unwrap();
    assert!(!coord.exists("/servers/h1").await.unwrap());
}
