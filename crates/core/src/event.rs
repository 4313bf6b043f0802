// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trace events: a closed sum type replacing the source's duck-typed,
//! reflection-based event class hierarchy.
//!
//! Each variant has a single `event-data` encoding (see the table in the
//! data model). `encode`/`decode` are the only place that string format
//! is allowed to leak; everything upstream works with [`TraceEvent`].

use crate::error::CoreError;
use crate::instance::InstanceName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Pending,
    Scheduled,
    Configured,
    ServiceRunning,
    ServiceExited,
    Finished,
    Aborted,
    Killed,
    Deleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Configured => "configured",
            Self::ServiceRunning => "service_running",
            Self::ServiceExited => "service_exited",
            Self::Finished => "finished",
            Self::Aborted => "aborted",
            Self::Killed => "killed",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Ok(match s {
            "pending" => Self::Pending,
            "scheduled" => Self::Scheduled,
            "configured" => Self::Configured,
            "service_running" => Self::ServiceRunning,
            "service_exited" => Self::ServiceExited,
            "finished" => Self::Finished,
            "aborted" => Self::Aborted,
            "killed" => Self::Killed,
            "deleted" => Self::Deleted,
            other => {
                return Err(CoreError::MalformedEventFile {
                    name: other.to_string(),
                    reason: "unknown event type".to_string(),
                })
            }
        })
    }

    /// True for the three terminal container-exit events that cause the
    /// event publisher to unschedule the instance.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Aborted | Self::Killed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Pending,
    Scheduled {
        server: String,
    },
    Configured {
        container_id: String,
    },
    ServiceRunning {
        container_id: String,
        service: String,
    },
    /// `signal` reuses `rc` for aborted (non-zero, non-137) exits: kept
    /// for wire compatibility, not semantically meaningful. Callers
    /// should not treat it as a real POSIX signal number except for the
    /// 137 (SIGKILL) and 0 cases.
    ServiceExited {
        container_id: String,
        service: String,
        rc: u16,
        signal: u16,
    },
    Finished {
        rc: u16,
        signal: u16,
    },
    Aborted {
        reason: String,
    },
    Killed {
        is_oom: bool,
    },
    Deleted,
}

impl TraceEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Pending => EventType::Pending,
            Self::Scheduled { .. } => EventType::Scheduled,
            Self::Configured { .. } => EventType::Configured,
            Self::ServiceRunning { .. } => EventType::ServiceRunning,
            Self::ServiceExited { .. } => EventType::ServiceExited,
            Self::Finished { .. } => EventType::Finished,
            Self::Aborted { .. } => EventType::Aborted,
            Self::Killed { .. } => EventType::Killed,
            Self::Deleted => EventType::Deleted,
        }
    }

    pub fn encode_data(&self) -> String {
        match self {
            Self::Pending | Self::Deleted => String::new(),
            Self::Scheduled { server } => server.clone(),
            Self::Configured { container_id } => container_id.clone(),
            Self::ServiceRunning {
                container_id,
                service,
            } => format!("{container_id}.{service}"),
            Self::ServiceExited {
                container_id,
                service,
                rc,
                signal,
            } => format!("{container_id}.{service}.{rc}.{signal}"),
            Self::Finished { rc, signal } => format!("{rc}.{signal}"),
            Self::Aborted { reason } => reason.clone(),
            Self::Killed { is_oom } => {
                if *is_oom {
                    "oom".to_string()
                } else {
                    String::new()
                }
            }
        }
    }

    pub fn decode(event_type: EventType, data: &str) -> Result<Self, CoreError> {
        let malformed = |reason: &str| CoreError::MalformedEventFile {
            name: data.to_string(),
            reason: reason.to_string(),
        };
        Ok(match event_type {
            EventType::Pending => Self::Pending,
            EventType::Deleted => Self::Deleted,
            EventType::Scheduled => Self::Scheduled {
                server: data.to_string(),
            },
            EventType::Configured => Self::Configured {
                container_id: data.to_string(),
            },
            EventType::ServiceRunning => {
                // container id never contains a dot; the service name may.
                let (container_id, service) = data
                    .split_once('.')
                    .ok_or_else(|| malformed("expected <container-id>.<service-name>"))?;
                Self::ServiceRunning {
                    container_id: container_id.to_string(),
                    service: service.to_string(),
                }
            }
            EventType::ServiceExited => {
                let (container_id, rest) = data
                    .split_once('.')
                    .ok_or_else(|| malformed("expected <container-id>.<service>.<rc>.<sig>"))?;
                let (service_and_rc, signal_str) = rest
                    .rsplit_once('.')
                    .ok_or_else(|| malformed("missing signal component"))?;
                let (service, rc_str) = service_and_rc
                    .rsplit_once('.')
                    .ok_or_else(|| malformed("missing rc component"))?;
                Self::ServiceExited {
                    container_id: container_id.to_string(),
                    service: service.to_string(),
                    rc: rc_str
                        .parse()
                        .map_err(|_| malformed("rc is not a valid exit code"))?,
                    signal: signal_str
                        .parse()
                        .map_err(|_| malformed("signal is not a valid exit code"))?,
                }
            }
            EventType::Finished => {
                // Split on the LAST dot, not the first: the source's
                // limited split mis-parses values with extra dots.
                let (rc_str, signal_str) = data
                    .rsplit_once('.')
                    .ok_or_else(|| malformed("expected <rc>.<signal>"))?;
                Self::Finished {
                    rc: rc_str
                        .parse()
                        .map_err(|_| malformed("rc is not a valid exit code"))?,
                    signal: signal_str
                        .parse()
                        .map_err(|_| malformed("signal is not a valid exit code"))?,
                }
            }
            EventType::Aborted => Self::Aborted {
                reason: data.to_string(),
            },
            EventType::Killed => Self::Killed {
                is_oom: data == "oom",
            },
        })
    }
}

/// The full event filename: `<timestamp>,<instance>,<type>,<data>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFile {
    pub timestamp_ms: u64,
    pub instance: InstanceName,
    pub event: TraceEvent,
}

impl EventFile {
    pub fn new(timestamp_ms: u64, instance: InstanceName, event: TraceEvent) -> Self {
        Self {
            timestamp_ms,
            instance,
            event,
        }
    }

    pub fn filename(&self) -> String {
        format!(
            "{},{},{},{}",
            self.timestamp_ms,
            self.instance,
            self.event.event_type().as_str(),
            self.event.encode_data()
        )
    }

    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let mut parts = name.splitn(4, ',');
        let malformed = |reason: &str| CoreError::MalformedEventFile {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let ts = parts.next().ok_or_else(|| malformed("missing timestamp"))?;
        let instance = parts.next().ok_or_else(|| malformed("missing instance"))?;
        let ty = parts.next().ok_or_else(|| malformed("missing event type"))?;
        let data = parts.next().unwrap_or("");

        let timestamp_ms = ts
            .parse()
            .map_err(|_| malformed("timestamp is not a number"))?;
        let event_type = EventType::parse(ty)?;
        let event = TraceEvent::decode(event_type, data)?;

        Ok(Self {
            timestamp_ms,
            instance: InstanceName::new(instance),
            event,
        })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
