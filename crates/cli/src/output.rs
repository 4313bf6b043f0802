// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON output selection, matching the teacher's `--format` contract.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `obj` as JSON, or run `text` for the human-readable rendering.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    obj: &T,
    text: impl FnOnce(),
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(obj)?);
        }
        OutputFormat::Text => text(),
    }
    Ok(())
}
