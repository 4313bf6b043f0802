// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The node-available signal. Screen-lock detection itself is an
//! external collaborator (§1): this module only reads the file it
//! writes and applies the (counter-intuitive, but preserved) policy
//! that "locked" means "user is away, machine may run workloads".

use std::path::Path;

/// `screen_state.txt` contains `"Lock"` or `"Unlock"`. Missing file or
/// any other content is treated as not available — a conservative
/// default, since it means the external collaborator hasn't reported in
/// yet.
pub fn node_available(screen_state_path: &Path) -> bool {
    std::fs::read_to_string(screen_state_path)
        .map(|s| s.trim() == "Lock")
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "screen_tests.rs"]
mod tests;
