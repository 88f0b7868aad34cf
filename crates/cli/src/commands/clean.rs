// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr clean <path>` — removes session state (and, recursively, every
//! scenario's state under a directory tree) without running anything.
//! This is the operator-invoked counterpart to the automatic TTL sweep
//! `exec` runs on every session start — useful after a `SIGKILL`'d
//! supervisor left a directory behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cli_replay_core::SystemClock;
use clap::Args;

use super::support::absolute;

#[derive(Args)]
pub struct CleanArgs {
    /// A scenario file, or (with --recursive) a directory to walk for
    /// `.cli-replay` state directories.
    pub path: PathBuf,

    /// Only remove this session's state, leaving siblings untouched.
    #[arg(long, conflicts_with_all = ["ttl", "recursive"])]
    pub session: Option<String>,

    /// Only remove state older than this duration (e.g. "24h") instead of
    /// unconditionally clearing everything.
    #[arg(long)]
    pub ttl: Option<String>,

    /// Treat `path` as a directory and clean every `.cli-replay` directory
    /// found under it.
    #[arg(long)]
    pub recursive: bool,
}

pub fn execute(args: CleanArgs) -> Result<i32> {
    let path = absolute(&args.path)?;
    let ttl = args
        .ttl
        .as_deref()
        .map(cli_replay_core::parse_duration)
        .transpose()
        .context("parsing --ttl")?;

    if args.recursive {
        let mut dirs = Vec::new();
        collect_state_dirs(&path, &mut dirs)?;
        for dir in &dirs {
            clean_one(dir, ttl)?;
        }
        eprintln!("cleaned {} state director{}", dirs.len(), if dirs.len() == 1 { "y" } else { "ies" });
        return Ok(0);
    }

    if let Some(session) = &args.session {
        let state_path = cli_replay_state::path_for(&path, session);
        cli_replay_state::delete(&state_path)
            .with_context(|| format!("removing state at {}", state_path.display()))?;
        eprintln!("removed session {session:?} for {}", path.display());
        return Ok(0);
    }

    clean_one(&cli_replay_state::state_dir(&path), ttl)?;
    eprintln!("cleaned {}", path.display());
    Ok(0)
}

fn clean_one(state_dir: &Path, ttl: Option<std::time::Duration>) -> Result<()> {
    match ttl {
        Some(ttl) => {
            let report = cli_replay_state::sweep(state_dir, ttl, &SystemClock);
            if !report.skipped_errors.is_empty() {
                for (path, message) in &report.skipped_errors {
                    eprintln!("warning: could not remove {}: {message}", path.display());
                }
            }
        }
        None => match std::fs::remove_dir_all(state_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("removing {}", state_dir.display()))
            }
        },
    }
    Ok(())
}

/// Walks `root` for `.cli-replay` directories, the state store's fixed
/// sibling-directory name.
fn collect_state_dirs(root: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("reading directory {}", root.display())),
    };
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry under {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(".cli-replay") {
            out.push(path);
        } else {
            collect_state_dirs(&path, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "clean_tests.rs"]
mod tests;
