// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serde-facing scenario schema. Every level is `deny_unknown_fields`
//! so unknown fields at any level are a parse error. These types are
//! intentionally permissive about *shape* (nearly everything optional) so
//! that validate.rs can accumulate every semantic problem in one pass
//! instead of serde bailing out on the first missing field.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawScenario {
    pub meta: RawMeta,
    #[serde(default)]
    pub steps: Vec<RawStepElement>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default)]
    pub security: Option<RawSecurity>,
    #[serde(default)]
    pub session: Option<RawSessionMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSecurity {
    #[serde(default)]
    pub allowed_commands: Vec<String>,
    #[serde(default)]
    pub deny_env_vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSessionMeta {
    pub ttl: String,
}

/// A step element can carry a `group` block (making it a Group) or a
/// `match`/`respond`/`calls` set (making it a Step); exactly one must be
/// populated, checked in validate.rs.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawStepElement {
    #[serde(default)]
    pub group: Option<RawGroup>,
    #[serde(default)]
    pub r#match: Option<RawMatchPattern>,
    #[serde(default)]
    pub respond: Option<RawResponse>,
    #[serde(default)]
    pub calls: Option<RawCallBounds>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGroup {
    pub mode: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<RawGroupStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGroupStep {
    pub r#match: RawMatchPattern,
    #[serde(default)]
    pub respond: Option<RawResponse>,
    #[serde(default)]
    pub calls: Option<RawCallBounds>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMatchPattern {
    #[serde(default)]
    pub argv: Vec<String>,
    #[serde(default)]
    pub stdin: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawResponse {
    #[serde(default)]
    pub exit: i64,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stdout_file: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub stderr_file: Option<String>,
    #[serde(default)]
    pub capture: IndexMap<String, String>,
    #[serde(default)]
    pub delay: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCallBounds {
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
}
