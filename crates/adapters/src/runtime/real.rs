// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker-backed [`ContainerRuntime`] using the Docker Engine API.

use async_trait::async_trait;
use bollard::container::{
    CreateContainerOptions, KillContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions,
};
use bollard::Docker;
use std::collections::HashMap;

use super::{ContainerRuntime, ContainerSpec, ExitSets, RuntimeError};

pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub fn connect_local() -> Result<Self, RuntimeError> {
        let docker = Docker::connect_with_local_defaults().map_err(api_err)?;
        Ok(Self { docker })
    }
}

fn api_err(e: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Api(e.to_string())
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn create(&self, spec: &ContainerSpec) -> Result<String, RuntimeError> {
        let config = bollard::container::Config {
            image: Some(spec.image.clone()),
            cmd: Some(
                spec.command
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            ),
            ..Default::default()
        };
        let response = self
            .docker
            .create_container(None::<CreateContainerOptions<String>>, config)
            .await
            .map_err(api_err)?;
        Ok(response.id)
    }

    async fn exists(&self, container_id: &str) -> Result<bool, RuntimeError> {
        match self.docker.inspect_container(container_id, None).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(api_err(e)),
        }
    }

    async fn start(&self, container_id: &str) -> Result<(), RuntimeError> {
        self.docker
            .start_container(container_id, None::<StartContainerOptions<String>>)
            .await
            .map_err(api_err)
    }

    async fn kill(&self, container_id: &str) -> Result<(), RuntimeError> {
        self.docker
            .kill_container(container_id, None::<KillContainerOptions<String>>)
            .await
            .map_err(api_err)
    }

    async fn remove(&self, container_id: &str) -> Result<(), RuntimeError> {
        self.docker
            .remove_container(
                container_id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await
            .map_err(api_err)
    }

    async fn exit_sets(&self) -> Result<ExitSets, RuntimeError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["exited".to_string()]);
        let options = ListContainersOptions::<String> {
            all: true,
            filters,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(options)).await.map_err(api_err)?;

        let mut sets = ExitSets::default();
        for summary in containers {
            let Some(id) = summary.id else { continue };
            sets.exited.insert(id.clone());
            let inspect = self.docker.inspect_container(&id, None).await.map_err(api_err)?;
            let exit_code = inspect
                .state
                .and_then(|s| s.exit_code)
                .unwrap_or(-1);
            match exit_code {
                0 => {
                    sets.finished.insert(id);
                }
                137 => {
                    sets.killed.insert(id);
                }
                c if (1..=255).contains(&c) => {
                    sets.aborted.insert(id, c as u16);
                }
                _ => {}
            }
        }
        Ok(sets)
    }
}
