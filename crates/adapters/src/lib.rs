// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! nodeward-adapters: coordinator and container-runtime clients.
//!
//! Each adapter follows the same shape: a trait contract, a `Real`
//! implementation backed by an external service, and (behind
//! `test-support`) a `Fake` in-memory implementation for component tests.

pub mod coordinator;
pub mod runtime;

pub use coordinator::{
    ChildrenEvent, Coordinator, CoordinatorError, DataEvent, EtcdCoordinator, NodeData,
    SessionState,
};
#[cfg(any(test, feature = "test-support"))]
pub use coordinator::FakeCoordinator;

pub use runtime::{ContainerRuntime, ContainerSpec, DockerRuntime, ExitSets, RuntimeError};
#[cfg(any(test, feature = "test-support"))]
pub use runtime::FakeRuntime;
