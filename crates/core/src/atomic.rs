// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic same-directory writes: every file in `cache/`, `running/` and
//! `cleanup/` is created by writing a sibling temp file and renaming it
//! over the final name, so readers never observe a partial write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

fn temp_name() -> String {
    format!(".tmp-{}", uuid::Uuid::new_v4())
}

/// Write `contents` to `dir/final_name` via a `.tmp-<random>` sibling and
/// an atomic rename. Overwrites any existing file at `final_name`.
pub fn atomic_write(dir: &Path, final_name: &str, contents: &[u8]) -> Result<(), CoreError> {
    fs::create_dir_all(dir).map_err(|source| io_err(dir, source))?;
    let tmp_path = dir.join(temp_name());
    write_file(&tmp_path, contents)?;
    let final_path = dir.join(final_name);
    fs::rename(&tmp_path, &final_path).map_err(|source| io_err(&final_path, source))?;
    Ok(())
}

/// Same as [`atomic_write`] but copies an existing file's contents,
/// matching the state monitor's running-marker-to-cleanup-marker
/// handoff (the cleanup marker is a byte-for-byte copy).
pub fn atomic_copy(src: &Path, dest_dir: &Path, final_name: &str) -> Result<(), CoreError> {
    let contents = fs::read(src).map_err(|source| io_err(src, source))?;
    atomic_write(dest_dir, final_name, &contents)
}

/// Remove `path` if present; absence is not an error (callers treat a
/// missing file the same as one they just deleted).
pub fn remove_if_present(path: &Path) -> Result<(), CoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_err(path, source)),
    }
}

/// Ensure the `.seen` sentinel exists in `dir`. Content is irrelevant:
/// only presence is meaningful.
pub fn ensure_seen(dir: &Path) -> Result<(), CoreError> {
    let path = dir.join(".seen");
    if path.exists() {
        return Ok(());
    }
    atomic_write(dir, ".seen", b"")
}

pub fn clear_seen(dir: &Path) -> Result<(), CoreError> {
    remove_if_present(&dir.join(".seen"))
}

/// List the non-dot entries of `dir` as owned file names, skipping
/// `.seen` and any leftover `.tmp-*` siblings. Returns an empty list if
/// the directory doesn't exist yet.
pub fn list_instance_files(dir: &Path) -> Result<Vec<String>, CoreError> {
    let mut names = Vec::new();
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
        Err(source) => return Err(io_err(dir, source)),
    };
    for entry in read_dir {
        let entry = entry.map_err(|source| io_err(dir, source))?;
        if let Some(name) = entry.file_name().to_str() {
            if crate::instance::InstanceName::is_instance_filename(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn write_file(path: &PathBuf, contents: &[u8]) -> Result<(), CoreError> {
    let mut f = fs::File::create(path).map_err(|source| io_err(path, source))?;
    f.write_all(contents).map_err(|source| io_err(path, source))?;
    f.sync_all().map_err(|source| io_err(path, source))?;
    Ok(())
}

fn io_err(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
