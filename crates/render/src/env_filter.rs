// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Env Filter: merges `meta.vars` + process environment
//! − denied-pattern variables into the render context, while internal
//! `CLI_REPLAY_*` variables are always preserved.

use std::collections::BTreeMap;

use crate::glob::glob_matches;

/// Internal variables are exempt from `deny_env_vars` unconditionally:
/// `CLI_REPLAY_*` names are reserved and always applied.
pub const INTERNAL_PREFIX: &str = "CLI_REPLAY_";

/// The merged, filtered variable map handed to the Renderer. Captures are
/// layered on separately by the caller under the fixed `capture` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredEnv {
    pub vars: BTreeMap<String, String>,
    /// Names denied this pass, for trace logging (never paired with values).
    pub denied: Vec<String>,
}

/// Builds the filtered variable map from `meta.vars`, the process
/// environment, and `meta.security.deny_env_vars`.
pub fn filter_env<I>(meta_vars: &BTreeMap<String, String>, deny_patterns: &[String], env: I) -> FilteredEnv
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut vars = meta_vars.clone();
    let mut denied = Vec::new();

    for (key, value) in env {
        let is_internal = key.starts_with(INTERNAL_PREFIX);
        let is_denied = !is_internal && deny_patterns.iter().any(|p| glob_matches(p, &key));
        if is_denied {
            denied.push(key);
            continue;
        }
        vars.insert(key, value);
    }

    FilteredEnv { vars, denied }
}

#[cfg(test)]
#[path = "env_filter_tests.rs"]
mod tests;
