// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation rules, accumulated rather than short-circuited.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use crate::error::ValidationError;
use crate::raw::{RawCallBounds, RawGroup, RawResponse, RawScenario, RawStepElement};
use crate::token::parse_token;

fn capture_id_re() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
}

fn capture_ref_re() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\.capture\.([A-Za-z_][A-Za-z0-9_]*)").unwrap()
}

/// Sequential 1-based ordinal among only the Group elements, used to
/// auto-assign `group-N` names in declaration order when none is given.
pub(crate) fn group_display_name(raw: &RawGroup, group_ordinal: usize) -> String {
    raw.name
        .clone()
        .unwrap_or_else(|| format!("group-{group_ordinal}"))
}

pub fn validate_scenario(raw: &RawScenario) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if raw.meta.name.trim().is_empty() {
        errors.push(ValidationError::new("meta.name", "must be non-empty"));
    }
    if raw.steps.is_empty() {
        errors.push(ValidationError::new("steps", "must be non-empty"));
    }
    if let Some(security) = &raw.meta.security {
        for (i, pattern) in security.deny_env_vars.iter().enumerate() {
            if pattern.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("meta.security.deny_env_vars[{i}]"),
                    "must be non-empty",
                ));
            }
        }
    }
    if let Some(session) = &raw.meta.session {
        match cli_replay_core::parse_duration(&session.ttl) {
            Ok(d) if d.is_zero() => errors.push(ValidationError::new(
                "meta.session.ttl",
                "must be a positive duration",
            )),
            Err(e) => errors.push(ValidationError::new(
                "meta.session.ttl",
                format!("invalid duration: {e}"),
            )),
            Ok(_) => {}
        }
    }

    let mut group_ordinal = 0usize;
    for (i, el) in raw.steps.iter().enumerate() {
        let is_group = el.group.is_some();
        let is_step = el.r#match.is_some() || el.respond.is_some() || el.calls.is_some();
        match (is_group, is_step) {
            (false, false) => errors.push(ValidationError::new(
                format!("steps[{i}]"),
                "neither `match`/`respond` (Step) nor `group` (Group) is populated",
            )),
            (true, true) => errors.push(ValidationError::new(
                format!("steps[{i}]"),
                "exactly one of Step or Group must be populated, not both",
            )),
            (true, false) => {
                group_ordinal += 1;
                if let Some(group) = &el.group {
                    validate_group(
                        group,
                        group_ordinal,
                        &format!("steps[{i}].group"),
                        &raw.meta.vars,
                        &mut errors,
                    );
                }
            }
            (false, true) => {
                validate_step_fields(
                    el.r#match.as_ref(),
                    el.respond.as_ref(),
                    el.calls.as_ref(),
                    &format!("steps[{i}]"),
                    &raw.meta.vars,
                    &mut errors,
                );
            }
        }
    }

    validate_capture_forward_references(raw, &mut errors);

    errors
}

#[allow(clippy::too_many_arguments)]
fn validate_step_fields(
    m: Option<&crate::raw::RawMatchPattern>,
    respond: Option<&RawResponse>,
    calls: Option<&RawCallBounds>,
    field: &str,
    vars: &BTreeMap<String, String>,
    errors: &mut Vec<ValidationError>,
) {
    match m {
        None => errors.push(ValidationError::new(format!("{field}.match"), "required")),
        Some(m) => {
            if m.argv.is_empty() {
                errors.push(ValidationError::new(
                    format!("{field}.match.argv"),
                    "must be non-empty",
                ));
            }
            for (i, tok) in m.argv.iter().enumerate() {
                if let Err(e) = parse_token(tok) {
                    errors.push(ValidationError::new(
                        format!("{field}.match.argv[{i}]"),
                        format!("invalid token: {e}"),
                    ));
                }
            }
        }
    }
    match respond {
        None => errors.push(ValidationError::new(format!("{field}.respond"), "required")),
        Some(r) => validate_response(r, &format!("{field}.respond"), vars, errors),
    }
    if let Some(c) = calls {
        validate_call_bounds(c, &format!("{field}.calls"), errors);
    }
}

fn validate_response(
    r: &RawResponse,
    field: &str,
    vars: &BTreeMap<String, String>,
    errors: &mut Vec<ValidationError>,
) {
    if !(0..=255).contains(&r.exit) {
        errors.push(ValidationError::new(
            format!("{field}.exit"),
            format!("must be in [0,255], got {}", r.exit),
        ));
    }
    if r.stdout.is_some() && r.stdout_file.is_some() {
        errors.push(ValidationError::new(
            format!("{field}"),
            "stdout and stdout_file are mutually exclusive",
        ));
    }
    if r.stderr.is_some() && r.stderr_file.is_some() {
        errors.push(ValidationError::new(
            format!("{field}"),
            "stderr and stderr_file are mutually exclusive",
        ));
    }
    let id_re = capture_id_re();
    for key in r.capture.keys() {
        if !id_re.is_match(key) {
            errors.push(ValidationError::new(
                format!("{field}.capture.{key}"),
                "capture identifier must match [A-Za-z_][A-Za-z0-9_]*",
            ));
        }
        if vars.contains_key(key) {
            errors.push(ValidationError::new(
                format!("{field}.capture.{key}"),
                "collides with a meta.vars key",
            ));
        }
    }
    if let Some(delay) = &r.delay {
        if let Err(e) = cli_replay_core::parse_duration(delay) {
            errors.push(ValidationError::new(
                format!("{field}.delay"),
                format!("invalid duration: {e}"),
            ));
        }
    }
}

fn validate_call_bounds(c: &RawCallBounds, field: &str, errors: &mut Vec<ValidationError>) {
    let min = c.min.unwrap_or(1);
    let max = c.max.unwrap_or(min.max(1));
    if max < 1 {
        errors.push(ValidationError::new(field, "max must be >= 1"));
    }
    if min > max {
        errors.push(ValidationError::new(
            field,
            format!("min ({min}) must be <= max ({max})"),
        ));
    }
}

fn validate_group(
    group: &RawGroup,
    ordinal: usize,
    field: &str,
    vars: &BTreeMap<String, String>,
    errors: &mut Vec<ValidationError>,
) {
    if group.mode != "unordered" {
        errors.push(ValidationError::new(
            format!("{field}.mode"),
            format!("only \"unordered\" is supported, got {:?}", group.mode),
        ));
    }
    if group.steps.is_empty() {
        errors.push(ValidationError::new(
            format!("{field}.steps"),
            "must be non-empty",
        ));
    }
    let _ = group_display_name(group, ordinal);
    for (i, step) in group.steps.iter().enumerate() {
        let step_field = format!("{field}.steps[{i}]");
        if step.r#match.argv.is_empty() {
            errors.push(ValidationError::new(
                format!("{step_field}.match.argv"),
                "must be non-empty",
            ));
        }
        for (j, tok) in step.r#match.argv.iter().enumerate() {
            if let Err(e) = parse_token(tok) {
                errors.push(ValidationError::new(
                    format!("{step_field}.match.argv[{j}]"),
                    format!("invalid token: {e}"),
                ));
            }
        }
        match &step.respond {
            None => errors.push(ValidationError::new(
                format!("{step_field}.respond"),
                "required",
            )),
            Some(r) => validate_response(r, &format!("{step_field}.respond"), vars, errors),
        }
        if let Some(c) = &step.calls {
            validate_call_bounds(c, &format!("{step_field}.calls"), errors);
        }
    }
}

/// Forward capture references are rejected at load time; undefined
/// references are fine (they render as empty string).
fn validate_capture_forward_references(raw: &RawScenario, errors: &mut Vec<ValidationError>) {
    let ref_re = capture_ref_re();

    // Flatten to (index, respond, label) in declaration order, mirroring
    // Scenario::flatten in cli-replay-core.
    struct Flat<'a> {
        label: String,
        respond: Option<&'a RawResponse>,
    }
    let mut flat: Vec<Flat> = Vec::new();
    for (i, el) in raw.steps.iter().enumerate() {
        if let Some(group) = &el.group {
            for (j, s) in group.steps.iter().enumerate() {
                flat.push(Flat {
                    label: format!("steps[{i}].group.steps[{j}]"),
                    respond: s.respond.as_ref(),
                });
            }
        } else if el.respond.is_some() || el.r#match.is_some() {
            flat.push(Flat {
                label: format!("steps[{i}]"),
                respond: el.respond.as_ref(),
            });
        }
    }

    let mut earliest_def: HashMap<String, usize> = HashMap::new();
    for (idx, f) in flat.iter().enumerate() {
        if let Some(r) = f.respond {
            for key in r.capture.keys() {
                earliest_def.entry(key.clone()).or_insert(idx);
            }
        }
    }

    for (idx, f) in flat.iter().enumerate() {
        let Some(r) = f.respond else { continue };
        let mut texts: Vec<&str> = Vec::new();
        if let Some(s) = &r.stdout {
            texts.push(s);
        }
        if let Some(s) = &r.stderr {
            texts.push(s);
        }
        for v in r.capture.values() {
            texts.push(v);
        }
        for text in texts {
            for cap in ref_re.captures_iter(text) {
                let id = &cap[1];
                if let Some(&def_idx) = earliest_def.get(id) {
                    if def_idx > idx {
                        errors.push(ValidationError::new(
                            format!("{}.respond", f.label),
                            format!(
                                "forward reference to capture `{id}` (defined at step {def_idx}, referenced at step {idx})"
                            ),
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
