// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Replay Engine: the interpreter invoked once per
//! intercepted command. [`replay`] is pure given its inputs — it never
//! touches disk itself (the caller owns loading/persisting [`State`] and
//! resolving `respond.*_file` against the scenario directory is the only
//! I/O performed here, and only on a match).

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use cli_replay_core::{Flattened, ResponseBody, Scenario, State};
use cli_replay_render::{render, RenderContext};

use crate::error::{EngineError, MismatchDiagnostic, StepExpectation};
use crate::matcher::{self, MatchOutcome};

pub struct Invocation<'a> {
    pub argv: &'a [String],
    pub stdin: Option<&'a [u8]>,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub env: Vec<(String, String)>,
    pub max_delay: Option<Duration>,
    pub trace: bool,
}

#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub matched_step: usize,
}

enum Resolution {
    Range(usize, usize),
    Consumed,
}

fn max_of(flat: &Flattened<'_>, i: usize) -> u32 {
    flat.steps[i].step.calls.max
}

fn min_of(flat: &Flattened<'_>, i: usize) -> u32 {
    flat.steps[i].step.calls.min
}

fn resolve(flat: &Flattened<'_>, working: &mut State) -> Resolution {
    loop {
        if working.current_step >= flat.steps.len() {
            return Resolution::Consumed;
        }
        if let Some(group) = flat.group_at(working.current_step) {
            let (start, end) = (group.start, group.end);
            let any_open = (start..end).any(|i| working.step_counts[i] < max_of(flat, i));
            if any_open {
                return Resolution::Range(start, end);
            }
            working.current_step = end;
            continue;
        }
        let i = working.current_step;
        if working.step_counts[i] < max_of(flat, i) {
            return Resolution::Range(i, i + 1);
        }
        working.current_step = i + 1;
    }
}

/// The command basename the scenario's `allowed_commands` list checks
/// against.
pub fn command_basename(argv0: &str) -> String {
    Path::new(argv0)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| argv0.to_string())
}

fn is_allowed(scenario: &Scenario, command: &str) -> bool {
    match &scenario.meta.security {
        Some(sec) if !sec.allowed_commands.is_empty() => {
            sec.allowed_commands.iter().any(|c| c == command)
        }
        _ => true,
    }
}

fn body_text(body: &ResponseBody, scenario_dir: &Path) -> Result<String, EngineError> {
    match body {
        ResponseBody::Empty => Ok(String::new()),
        ResponseBody::Inline(s) => Ok(s.clone()),
        ResponseBody::File(p) => {
            let resolved = if p.is_absolute() {
                p.clone()
            } else {
                scenario_dir.join(p)
            };
            std::fs::read_to_string(&resolved).map_err(|source| EngineError::ResponseFile {
                path: resolved,
                source,
            })
        }
    }
}

fn build_expectations(flat: &Flattened<'_>, indices: &[usize]) -> Vec<StepExpectation> {
    indices
        .iter()
        .map(|&i| StepExpectation {
            index: i,
            group: flat.steps[i].group.map(|g| g.to_string()),
            argv: flat.steps[i]
                .step
                .r#match
                .argv
                .iter()
                .map(|t| t.display())
                .collect(),
            detail: None,
        })
        .collect()
}

/// Runs one intercepted command against `scenario`/`state`.
///
/// Returns the new `State` and the rendered outcome on a match. On
/// mismatch or render failure, `state` is left untouched by the caller —
/// this function never mutates its `state` argument, only a private
/// clone — state is not advanced on mismatch.
pub fn replay(
    scenario: &Scenario,
    state: &State,
    invocation: &Invocation<'_>,
    scenario_dir: &Path,
    options: &ReplayOptions,
) -> Result<(State, ReplayOutcome), EngineError> {
    if let Some(argv0) = invocation.argv.first() {
        let command = command_basename(argv0);
        if !is_allowed(scenario, &command) {
            return Err(EngineError::NotAllowed { command });
        }
    }

    let flat = scenario.flatten();
    let mut working = state.clone();

    loop {
        match resolve(&flat, &mut working) {
            Resolution::Consumed => {
                return Err(EngineError::Mismatch(MismatchDiagnostic {
                    scenario_name: scenario.meta.name.clone(),
                    received_argv: invocation.argv.to_vec(),
                    expectations: Vec::new(),
                }));
            }
            Resolution::Range(start, end) => {
                let eligible: Vec<usize> =
                    (start..end).filter(|&i| working.step_counts[i] < max_of(&flat, i)).collect();

                let found = eligible.iter().copied().find(|&i| {
                    matcher::matches(&flat.steps[i].step.r#match, invocation.argv, invocation.stdin)
                        == MatchOutcome::Match
                });

                if let Some(idx) = found {
                    return handle_match(scenario, &flat, working, idx, invocation, scenario_dir, options);
                }

                let all_min_met = (start..end).all(|i| working.step_counts[i] >= min_of(&flat, i));
                if all_min_met {
                    working.current_step = end;
                    continue;
                }

                return Err(EngineError::Mismatch(MismatchDiagnostic {
                    scenario_name: scenario.meta.name.clone(),
                    received_argv: invocation.argv.to_vec(),
                    expectations: build_expectations(&flat, &eligible),
                }));
            }
        }
    }
}

fn handle_match(
    scenario: &Scenario,
    flat: &Flattened<'_>,
    mut working: State,
    idx: usize,
    invocation: &Invocation<'_>,
    scenario_dir: &Path,
    options: &ReplayOptions,
) -> Result<(State, ReplayOutcome), EngineError> {
    working.step_counts[idx] += 1;
    let step = flat.steps[idx].step;

    let deny_patterns = scenario
        .meta
        .security
        .as_ref()
        .map(|s| s.deny_env_vars.as_slice())
        .unwrap_or(&[]);
    let filtered = cli_replay_render::filter_env(
        &scenario.meta.vars,
        deny_patterns,
        options.env.iter().cloned(),
    );
    if options.trace {
        for name in &filtered.denied {
            tracing::debug!(name = %name, "denied env var");
        }
    }

    let mut captures: BTreeMap<String, String> = working.captures.clone();
    for (id, template) in &step.respond.capture {
        if captures.contains_key(id) {
            continue; // append-only: first definition for this session wins
        }
        let ctx = RenderContext {
            vars: &filtered.vars,
            captures: &captures,
        };
        let value = render(template, &ctx)?;
        captures.insert(id.clone(), value);
    }
    working.captures = captures.clone();

    let ctx = RenderContext {
        vars: &filtered.vars,
        captures: &captures,
    };
    let stdout_template = body_text(&step.respond.stdout, scenario_dir)?;
    let stderr_template = body_text(&step.respond.stderr, scenario_dir)?;
    let stdout = render(&stdout_template, &ctx)?;
    let stderr = render(&stderr_template, &ctx)?;

    if working.step_counts[idx] == max_of(flat, idx) {
        let group_range = flat.group_at(idx).map(|g| (g.start, g.end));
        let (start, end) = group_range.unwrap_or((idx, idx + 1));
        let remaining = (start..end).filter(|&i| working.step_counts[i] < max_of(flat, i)).count();
        if remaining == 0 {
            working.current_step = end;
        }
    }

    if let Some(delay) = step.respond.delay {
        let capped = cli_replay_render::effective_delay(delay, options.max_delay);
        cli_replay_render::apply_delay(capped);
    }

    Ok((
        working,
        ReplayOutcome {
            exit_code: step.respond.exit as i32,
            stdout: stdout.into_bytes(),
            stderr: stderr.into_bytes(),
            matched_step: idx,
        },
    ))
}

#[cfg(test)]
#[path = "interpreter_tests.rs"]
mod tests;
