// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intercept directory setup: one entry per distinct intercepted command,
//! pointing back at this binary, so the scenario's commands resolve to us
//! when the child's `PATH` is prepended with this directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cli_replay_core::{Scenario, StepElement};

use crate::error::SessionError;

/// The distinct command basenames a scenario's steps expect to intercept,
/// derived from each step's `match.argv[0]`.
pub fn intercepted_commands(scenario: &Scenario) -> BTreeSet<String> {
    let mut commands = BTreeSet::new();
    let mut collect = |step: &cli_replay_core::Step| {
        if let Some(first) = step.r#match.argv.first() {
            commands.insert(first.display());
        }
    };
    for el in &scenario.steps {
        match el {
            StepElement::Step(s) => collect(s),
            StepElement::Group(g) => g.steps.iter().for_each(&mut collect),
        }
    }
    commands
}

pub struct InterceptDir {
    pub path: PathBuf,
}

impl InterceptDir {
    /// Creates a fresh intercept directory at `root` containing one entry
    /// per command in `commands`, each resolving back to `binary`.
    ///
    /// Unix: a symlink named after the command. Windows: a `<cmd>.cmd`
    /// wrapper (plus a `.ps1` companion) that re-invokes `binary` with the
    /// command name preserved as `argv[0]`.
    pub fn create(
        root: &Path,
        commands: &BTreeSet<String>,
        binary: &Path,
    ) -> Result<Self, SessionError> {
        std::fs::create_dir_all(root).map_err(|source| SessionError::InterceptSetup {
            path: root.to_path_buf(),
            source,
        })?;

        for command in commands {
            create_entry(root, command, binary)?;
        }

        Ok(Self {
            path: root.to_path_buf(),
        })
    }

    /// Best-effort removal; safe to call more than once.
    pub fn remove(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove intercept directory");
            }
        }
    }
}

#[cfg(unix)]
fn create_entry(root: &Path, command: &str, binary: &Path) -> Result<(), SessionError> {
    let link_path = root.join(command);
    std::os::unix::fs::symlink(binary, &link_path).map_err(|source| SessionError::InterceptSetup {
        path: link_path,
        source,
    })
}

#[cfg(windows)]
fn create_entry(root: &Path, command: &str, binary: &Path) -> Result<(), SessionError> {
    let binary_display = binary.display();
    let cmd_path = root.join(format!("{command}.cmd"));
    // cmd.exe wrappers cannot rewrite argv[0], so the command name is
    // threaded through an env var the Intercept Entry Point checks first
    // (see crates/cli/src/intercept.rs); Unix relies on argv[0] alone.
    let cmd_body =
        format!("@echo off\r\nset CLI_REPLAY_INTERCEPT_CMD={command}\r\n\"{binary_display}\" %*\r\n");
    std::fs::write(&cmd_path, cmd_body).map_err(|source| SessionError::InterceptSetup {
        path: cmd_path.clone(),
        source,
    })?;

    let ps1_path = root.join(format!("{command}.ps1"));
    let ps1_body = format!("$env:CLI_REPLAY_INTERCEPT_CMD = \"{command}\"\r\n& \"{binary_display}\" @Args\r\n");
    std::fs::write(&ps1_path, ps1_body).map_err(|source| SessionError::InterceptSetup {
        path: ps1_path,
        source,
    })?;
    Ok(())
}

/// Prepends `dir` to the `base` `PATH` value for the child environment.
pub fn prepend_path(dir: &Path, base: Option<&str>) -> String {
    match base {
        Some(existing) if !existing.is_empty() => {
            format!("{}{}{}", dir.display(), path_separator(), existing)
        }
        _ => dir.display().to_string(),
    }
}

#[cfg(unix)]
fn path_separator() -> char {
    ':'
}

#[cfg(windows)]
fn path_separator() -> char {
    ';'
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
