// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! etcd-backed [`Coordinator`]. Ephemeral nodes are modelled as keys
//! attached to a lease the client keeps alive on a background task;
//! the lease expires (and the key is removed server-side) when the
//! session is lost, matching the coordinator contract's "ephemeral
//! nodes are automatically removed when the session ends".

use async_trait::async_trait;
use etcd_client::{Client, GetOptions, PutOptions, WatchOptions};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::{ChildrenEvent, Coordinator, CoordinatorError, DataEvent, NodeData, SessionState};

pub struct EtcdCoordinator {
    client: Mutex<Client>,
    session: Arc<Mutex<SessionState>>,
    /// Lease ids backing ephemeral nodes, keyed by path, so `delete` and
    /// session recovery can find and revoke them.
    leases: Arc<Mutex<HashMap<String, i64>>>,
}

impl EtcdCoordinator {
    pub async fn connect(endpoint: &str) -> Result<Self, CoordinatorError> {
        let client = Client::connect([endpoint], None)
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        Ok(Self {
            client: Mutex::new(client),
            session: Arc::new(Mutex::new(SessionState::Connected)),
            leases: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn client(&self) -> Client {
        self.client.lock().clone()
    }
}

#[async_trait]
impl Coordinator for EtcdCoordinator {
    async fn get(&self, path: &str) -> Result<NodeData, CoordinatorError> {
        let mut resp = self
            .client()
            .get(path, None)
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        let kv = resp
            .take_kvs()
            .into_iter()
            .next()
            .ok_or_else(|| CoordinatorError::NoNode(path.to_string()))?;
        Ok(NodeData {
            payload: kv.value().to_vec(),
            ephemeral: kv.lease() != 0,
        })
    }

    async fn exists(&self, path: &str) -> Result<bool, CoordinatorError> {
        match self.get(path).await {
            Ok(_) => Ok(true),
            Err(CoordinatorError::NoNode(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, path: &str, data: &[u8], ephemeral: bool) -> Result<(), CoordinatorError> {
        if self.exists(path).await? {
            return Err(CoordinatorError::NodeExists(path.to_string()));
        }
        let mut client = self.client();
        let mut opts = PutOptions::new();
        if ephemeral {
            let lease = client
                .lease_grant(30, None)
                .await
                .map_err(|e| CoordinatorError::Other(e.to_string()))?;
            let lease_id = lease.id();
            self.leases.lock().insert(path.to_string(), lease_id);
            opts = opts.with_lease(lease_id);

            let (_keeper, mut stream) = client
                .lease_keep_alive(lease_id)
                .await
                .map_err(|e| CoordinatorError::Other(e.to_string()))?;
            let session = self.session.clone();
            tokio::spawn(async move {
                let _keeper = _keeper;
                loop {
                    match stream.message().await {
                        Ok(Some(_)) => continue,
                        Ok(None) | Err(_) => {
                            *session.lock() = SessionState::Lost;
                            warn!("etcd lease keep-alive stream ended; session lost");
                            break;
                        }
                    }
                }
            });
        }
        client
            .put(path, data, Some(opts))
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        Ok(())
    }

    async fn set_data(&self, path: &str, data: &[u8]) -> Result<(), CoordinatorError> {
        self.client()
            .put(path, data, None)
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), CoordinatorError> {
        self.leases.lock().remove(path);
        self.client()
            .delete(path, None)
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        Ok(())
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, CoordinatorError> {
        let prefix = format!("{path}/");
        let resp = self
            .client()
            .get(prefix.as_str(), Some(GetOptions::new().with_prefix()))
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        let mut names: Vec<String> = resp
            .kvs()
            .iter()
            .filter_map(|kv| kv.key_str().ok())
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|s| s.to_string())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn watch_data(&self, path: &str) -> Result<mpsc::Receiver<DataEvent>, CoordinatorError> {
        let (watcher_tx, watcher_rx) = mpsc::channel(32);
        let (mut _watcher, mut stream) = self
            .client()
            .watch(path, None)
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        tokio::spawn(async move {
            let _watcher = _watcher;
            while let Ok(Some(resp)) = stream.message().await {
                for event in resp.events() {
                    let sent = match event.event_type() {
                        etcd_client::EventType::Put => event
                            .kv()
                            .map(|kv| DataEvent::Updated(kv.value().to_vec())),
                        etcd_client::EventType::Delete => Some(DataEvent::Deleted),
                    };
                    if let Some(ev) = sent {
                        if watcher_tx.send(ev).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });
        Ok(watcher_rx)
    }

    async fn watch_children(
        &self,
        path: &str,
    ) -> Result<mpsc::Receiver<ChildrenEvent>, CoordinatorError> {
        let (tx, rx) = mpsc::channel(32);
        let prefix = format!("{path}/");
        let (mut _watcher, mut stream) = self
            .client()
            .watch(prefix.as_str(), Some(WatchOptions::new().with_prefix()))
            .await
            .map_err(|e| CoordinatorError::Other(e.to_string()))?;
        let me_children = self.children(path).await.unwrap_or_default();
        if tx.send(ChildrenEvent::Updated(me_children)).await.is_err() {
            return Ok(rx);
        }
        let client = self.client();
        tokio::spawn(async move {
            let _watcher = _watcher;
            while (stream.message().await).is_ok() {
                let Ok(resp) = client.clone().get(
                    prefix.as_str(),
                    Some(GetOptions::new().with_prefix()),
                ).await else { continue };
                let names: Vec<String> = resp
                    .kvs()
                    .iter()
                    .filter_map(|kv| kv.key_str().ok())
                    .filter_map(|key| key.strip_prefix(&prefix))
                    .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                    .map(|s| s.to_string())
                    .collect();
                if tx.send(ChildrenEvent::Updated(names)).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    fn session_state(&self) -> SessionState {
        *self.session.lock()
    }
}
