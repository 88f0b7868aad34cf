// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cli-replay-loader: parses and validates a scenario document into the
//! immutable model of `cli-replay-core::scenario`. No side effects: `load`
//! and `validate_files` never create directories or touch anything outside
//! the paths given to them.

mod convert;
mod error;
mod raw;
mod token;
mod validate;

use std::path::{Path, PathBuf};

use cli_replay_core::{Scenario, ResponseBody, StepElement};

pub use error::{LoadError, ValidationError};
pub use raw::RawScenario;

/// Parses and validates the scenario at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Scenario, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(path, &content)
}

/// Parses and validates scenario YAML already read into memory. Split out
/// from [`load`] so tests don't need real files for every case.
pub fn load_str(path: &Path, content: &str) -> Result<Scenario, LoadError> {
    let raw: raw::RawScenario = serde_yaml::from_str(content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
        line: e.location().map(|l| l.line()),
    })?;

    let errors = validate::validate_scenario(&raw);
    if !errors.is_empty() {
        return Err(LoadError::Validation {
            path: path.to_path_buf(),
            errors,
        });
    }

    convert::convert_scenario(raw).map_err(|message| LoadError::Parse {
        path: path.to_path_buf(),
        message,
        line: None,
    })
}

#[derive(Debug, Clone)]
pub struct FileCheckResult {
    pub path: PathBuf,
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Loads and validates every path independently; a failure on one path
/// never stops the others from being checked.
pub fn validate_files(paths: &[PathBuf]) -> Vec<FileCheckResult> {
    paths
        .iter()
        .map(|path| match load(path) {
            Ok(scenario) => {
                let missing = check_referenced_files(path, &scenario);
                FileCheckResult {
                    path: path.clone(),
                    valid: missing.is_empty(),
                    errors: missing,
                }
            }
            Err(e) => FileCheckResult {
                path: path.clone(),
                valid: false,
                errors: match &e {
                    LoadError::Validation { errors, .. } => {
                        errors.iter().map(|v| v.to_string()).collect()
                    }
                    other => vec![other.to_string()],
                },
            },
        })
        .collect()
}

fn check_referenced_files(scenario_path: &Path, scenario: &Scenario) -> Vec<String> {
    let dir = scenario_path.parent().unwrap_or_else(|| Path::new("."));
    let mut missing = Vec::new();
    let mut check = |body: &ResponseBody| {
        if let ResponseBody::File(rel) = body {
            let resolved = if rel.is_absolute() {
                rel.clone()
            } else {
                dir.join(rel)
            };
            if !resolved.exists() {
                missing.push(format!("referenced file not found: {}", resolved.display()));
            }
        }
    };
    for el in &scenario.steps {
        match el {
            StepElement::Step(s) => {
                check(&s.respond.stdout);
                check(&s.respond.stderr);
            }
            StepElement::Group(g) => {
                for s in &g.steps {
                    check(&s.respond.stdout);
                    check(&s.respond.stderr);
                }
            }
        }
    }
    missing
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
