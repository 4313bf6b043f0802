// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator path builders. Centralised here so every component
//! constructs the same paths the same way.

pub fn servers(host: &str) -> String {
    format!("/servers/{host}")
}

pub fn server_node_template() -> String {
    "/servers/node".to_string()
}

pub fn server_presence(host: &str) -> String {
    format!("/server.presence/{host}")
}

pub fn blackout(host: &str) -> String {
    format!("/blackedout.servers/{host}")
}

pub fn placement_root(host: &str) -> String {
    format!("/placement/{host}")
}

pub fn placement(host: &str, instance: &str) -> String {
    format!("/placement/{host}/{instance}")
}

pub fn scheduled(instance: &str) -> String {
    format!("/scheduled/{instance}")
}

/// `/tasks/<app-parts>`, where `app-parts` is the instance's app name
/// with `#` segments rendered as path segments (the original source
/// joins the instance's dot/hash-split parts with `/`).
pub fn tasks_app(app: &str) -> String {
    let parts: Vec<&str> = app.split('#').collect();
    format!("/tasks/{}", parts.join("/"))
}

pub fn tasks_event(app: &str, event_name: &str) -> String {
    format!("{}/{}", tasks_app(app), event_name)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
