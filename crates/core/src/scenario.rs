// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The compiled, immutable scenario data model.
//!
//! Values here are produced by `cli-replay-loader` after validation; nothing
//! in this module parses untrusted input directly (regex tokens arrive
//! already compiled). The model is deliberately a flat tree plus a
//! side-table of group ranges rather than a recursive structure the matcher
//! has to re-walk — see `Scenario::flatten`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub meta: Meta,
    pub steps: Vec<StepElement>,
}

#[derive(Debug, Clone)]
pub struct Meta {
    pub name: String,
    pub description: String,
    pub vars: BTreeMap<String, String>,
    pub security: Option<Security>,
    pub session: Option<SessionMeta>,
}

#[derive(Debug, Clone)]
pub struct Security {
    pub allowed_commands: Vec<String>,
    pub deny_env_vars: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionMeta {
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub enum StepElement {
    Step(Step),
    Group(Group),
}

#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub r#match: MatchPattern,
    pub respond: Response,
    pub calls: CallBounds,
}

#[derive(Debug, Clone)]
pub struct MatchPattern {
    pub argv: Vec<ArgvToken>,
    pub stdin: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ArgvToken {
    Literal(String),
    Wildcard,
    /// `pattern` is already anchored (`^(?:source)$`) at load time so a
    /// match always spans the whole argv element.
    Regex { source: String, pattern: Arc<Regex> },
}

impl ArgvToken {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ArgvToken::Literal(lit) => lit == value,
            ArgvToken::Wildcard => true,
            ArgvToken::Regex { pattern, .. } => pattern.is_match(value),
        }
    }

    /// Human-readable form for mismatch diagnostics.
    pub fn display(&self) -> String {
        match self {
            ArgvToken::Literal(lit) => lit.clone(),
            ArgvToken::Wildcard => "*".to_string(),
            ArgvToken::Regex { source, .. } => format!("~{source}~"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Inline(String),
    /// Path relative to the scenario's directory, already resolved absolute
    /// by the loader.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Response {
    pub exit: u8,
    pub stdout: ResponseBody,
    pub stderr: ResponseBody,
    /// Ordered capture definitions: identifier -> value template.
    /// Declaration order is preserved, not sorted, since later entries may
    /// be rendered with earlier ones already in context.
    pub capture: Vec<(String, String)>,
    pub delay: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
pub struct CallBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for CallBounds {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

pub struct FlatStep<'a> {
    pub index: usize,
    pub step: &'a Step,
    pub group: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct GroupRange {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

pub struct Flattened<'a> {
    pub steps: Vec<FlatStep<'a>>,
    pub groups: Vec<GroupRange>,
}

impl Flattened<'_> {
    /// The group range containing `index`, if any.
    pub fn group_at(&self, index: usize) -> Option<&GroupRange> {
        self.groups
            .iter()
            .find(|g| index >= g.start && index < g.end)
    }
}

impl Scenario {
    pub fn total_steps(&self) -> usize {
        self.steps
            .iter()
            .map(|e| match e {
                StepElement::Step(_) => 1,
                StepElement::Group(g) => g.steps.len(),
            })
            .sum()
    }

    /// Flattens the top-level Step/Group tree into an ordered leaf sequence
    /// plus a side table of group ranges, so the matcher can index by cursor
    /// position instead of re-walking a recursive tree.
    pub fn flatten(&self) -> Flattened<'_> {
        let mut steps = Vec::with_capacity(self.total_steps());
        let mut groups = Vec::new();
        for el in &self.steps {
            match el {
                StepElement::Step(s) => {
                    let index = steps.len();
                    steps.push(FlatStep {
                        index,
                        step: s,
                        group: None,
                    });
                }
                StepElement::Group(g) => {
                    let start = steps.len();
                    for s in &g.steps {
                        let index = steps.len();
                        steps.push(FlatStep {
                            index,
                            step: s,
                            group: Some(g.name.as_str()),
                        });
                    }
                    groups.push(GroupRange {
                        name: g.name.clone(),
                        start,
                        end: steps.len(),
                    });
                }
            }
        }
        Flattened { steps, groups }
    }

    /// Content hash over the canonical (field-order, not byte-order) shape
    /// of the scenario so that re-parsing formatting-only edits yields the
    /// same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        self.hash_into(&mut hasher);
        format!("{:x}", hasher.finalize())
    }

    fn hash_into(&self, h: &mut Sha256) {
        hash_str(h, &self.meta.name);
        hash_str(h, &self.meta.description);
        for (k, v) in &self.meta.vars {
            hash_str(h, k);
            hash_str(h, v);
        }
        if let Some(sec) = &self.meta.security {
            for c in &sec.allowed_commands {
                hash_str(h, c);
            }
            for p in &sec.deny_env_vars {
                hash_str(h, p);
            }
        }
        if let Some(session) = &self.meta.session {
            hash_str(h, &session.ttl.as_nanos().to_string());
        }
        hash_str(h, &self.steps.len().to_string());
        for el in &self.steps {
            match el {
                StepElement::Step(s) => {
                    hash_str(h, "step");
                    hash_step(h, s);
                }
                StepElement::Group(g) => {
                    hash_str(h, "group");
                    hash_str(h, &g.name);
                    hash_str(h, &g.steps.len().to_string());
                    for s in &g.steps {
                        hash_step(h, s);
                    }
                }
            }
        }
    }
}

fn hash_step(h: &mut Sha256, s: &Step) {
    for token in &s.r#match.argv {
        match token {
            ArgvToken::Literal(lit) => {
                hash_str(h, "lit");
                hash_str(h, lit);
            }
            ArgvToken::Wildcard => hash_str(h, "wild"),
            ArgvToken::Regex { source, .. } => {
                hash_str(h, "regex");
                hash_str(h, source);
            }
        }
    }
    if let Some(stdin) = &s.r#match.stdin {
        hash_str(h, stdin);
    }
    hash_str(h, &s.respond.exit.to_string());
    hash_body(h, &s.respond.stdout);
    hash_body(h, &s.respond.stderr);
    for (k, v) in &s.respond.capture {
        hash_str(h, k);
        hash_str(h, v);
    }
    if let Some(delay) = s.respond.delay {
        hash_str(h, &delay.as_nanos().to_string());
    }
    hash_str(h, &s.calls.min.to_string());
    hash_str(h, &s.calls.max.to_string());
}

fn hash_body(h: &mut Sha256, body: &ResponseBody) {
    match body {
        ResponseBody::Empty => hash_str(h, "empty"),
        ResponseBody::Inline(s) => {
            hash_str(h, "inline");
            hash_str(h, s);
        }
        ResponseBody::File(p) => {
            hash_str(h, "file");
            hash_str(h, &p.to_string_lossy());
        }
    }
}

fn hash_str(h: &mut Sha256, s: &str) {
    h.update((s.len() as u64).to_le_bytes());
    h.update(s.as_bytes());
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod tests;
