// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The State Store: atomic, crash-safe persistence of one
//! [`State`] record per (scenario path, session id) pair, with TTL sweep
//! of stale siblings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cli_replay_core::{Clock, State};
use sha2::{Digest, Sha256};

use crate::error::StateError;

const STATE_DIR_NAME: &str = ".cli-replay";

/// The directory siblings live in, next to the scenario file.
pub fn state_dir(scenario_path: &Path) -> PathBuf {
    scenario_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(STATE_DIR_NAME)
}

/// Derives the state file path from a stable hash of the absolute scenario
/// path plus the session id, so two scenarios or two sessions never collide.
pub fn path_for(scenario_path: &Path, session_id: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(scenario_path.to_string_lossy().as_bytes());
    hasher.update([0u8]);
    hasher.update(session_id.as_bytes());
    let digest = hasher.finalize();
    state_dir(scenario_path).join(format!("{digest:x}.json"))
}

/// Reads the State at `path`. A missing file is `Ok(None)` ("fresh state");
/// an unparseable one is `Err(StateError::Corrupt)` — fatal for the
/// session, never silently reset.
pub fn read(path: &Path) -> Result<Option<State>, StateError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StateError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Writes `state` to `path` via write-tmp + atomic rename, stamping
/// `last_updated` with `clock.now_ms()` first.
pub fn write(path: &Path, state: &mut State, clock: &dyn Clock) -> Result<(), StateError> {
    state.last_updated = clock.now_ms();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| StateError::Io {
        path: parent.to_path_buf(),
        source: e,
    })?;

    let payload = serde_json::to_vec_pretty(state).map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let tmp_path = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "state".to_string()),
        std::process::id()
    ));
    std::fs::write(&tmp_path, &payload).map_err(|e| StateError::Io {
        path: tmp_path.clone(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| StateError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Idempotent: a missing file is not an error.
pub fn delete(path: &Path) -> Result<(), StateError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StateError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub skipped_future: Vec<PathBuf>,
    pub skipped_errors: Vec<(PathBuf, String)>,
}

/// Removes every state file in `dir` whose `last_updated` is older than
/// `now - ttl`. Files with a `last_updated` in the future are left
/// untouched (and reported); per-file read/permission errors are logged
/// and skipped rather than aborting the sweep.
pub fn sweep(dir: &Path, ttl: Duration, clock: &dyn Clock) -> SweepReport {
    let mut report = SweepReport::default();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "state sweep: cannot read directory");
            return report;
        }
    };

    let now = clock.now_ms();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read(&path) {
            Ok(Some(state)) => {
                if state.last_updated > now {
                    tracing::warn!(path = %path.display(), "state sweep: last_updated is in the future, skipping");
                    report.skipped_future.push(path);
                    continue;
                }
                let age_ms = now.saturating_sub(state.last_updated);
                if age_ms as u128 > ttl.as_millis() {
                    if let Err(e) = delete(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "state sweep: failed to remove stale state");
                        report.skipped_errors.push((path, e.to_string()));
                    } else {
                        report.removed.push(path);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state sweep: skipping unreadable file");
                report.skipped_errors.push((path, e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
