// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw → compiled conversion. Only called after `validate::validate_scenario`
//! has returned no errors, but still returns `Result` rather than
//! unwrapping — token/duration parsing is cheap to re-check and a silent
//! panic here would be a far worse failure mode than a second error path.

use cli_replay_core::{
    CallBounds, Group, MatchPattern, Meta, Response, ResponseBody, Scenario, Security,
    SessionMeta, Step, StepElement,
};

use crate::raw::{RawCallBounds, RawGroup, RawMatchPattern, RawResponse, RawScenario};
use crate::token::parse_token;
use crate::validate::group_display_name;

pub fn convert_scenario(raw: RawScenario) -> Result<Scenario, String> {
    let meta = Meta {
        name: raw.meta.name,
        description: raw.meta.description,
        vars: raw.meta.vars,
        security: raw.meta.security.map(|s| Security {
            allowed_commands: s.allowed_commands,
            deny_env_vars: s.deny_env_vars,
        }),
        session: raw
            .meta
            .session
            .map(|s| -> Result<SessionMeta, String> {
                Ok(SessionMeta {
                    ttl: cli_replay_core::parse_duration(&s.ttl).map_err(|e| e.to_string())?,
                })
            })
            .transpose()?,
    };

    let mut steps = Vec::with_capacity(raw.steps.len());
    let mut group_ordinal = 0usize;
    for el in raw.steps {
        if let Some(group) = el.group {
            group_ordinal += 1;
            steps.push(StepElement::Group(convert_group(group, group_ordinal)?));
        } else {
            steps.push(StepElement::Step(convert_step(
                el.r#match.unwrap_or(RawMatchPattern {
                    argv: Vec::new(),
                    stdin: None,
                }),
                el.respond.unwrap_or_default_response(),
                el.calls,
            )?));
        }
    }

    Ok(Scenario { meta, steps })
}

fn convert_group(raw: RawGroup, ordinal: usize) -> Result<Group, String> {
    let name = group_display_name(&raw, ordinal);
    let mut steps = Vec::with_capacity(raw.steps.len());
    for s in raw.steps {
        steps.push(convert_step(s.r#match, s.respond.unwrap_or_default_response(), s.calls)?);
    }
    Ok(Group { name, steps })
}

fn convert_step(
    m: RawMatchPattern,
    respond: RawResponse,
    calls: Option<RawCallBounds>,
) -> Result<Step, String> {
    let mut argv = Vec::with_capacity(m.argv.len());
    for tok in &m.argv {
        argv.push(parse_token(tok)?);
    }
    let min = calls.as_ref().and_then(|c| c.min).unwrap_or(1);
    let max = calls
        .as_ref()
        .and_then(|c| c.max)
        .unwrap_or_else(|| min.max(1));
    Ok(Step {
        r#match: MatchPattern {
            argv,
            stdin: m.stdin,
        },
        respond: convert_response(respond)?,
        calls: CallBounds { min, max },
    })
}

fn convert_response(r: RawResponse) -> Result<Response, String> {
    let stdout = match (r.stdout, r.stdout_file) {
        (Some(s), None) => ResponseBody::Inline(s),
        (None, Some(f)) => ResponseBody::File(f.into()),
        (None, None) => ResponseBody::Empty,
        (Some(_), Some(_)) => return Err("stdout and stdout_file both set".to_string()),
    };
    let stderr = match (r.stderr, r.stderr_file) {
        (Some(s), None) => ResponseBody::Inline(s),
        (None, Some(f)) => ResponseBody::File(f.into()),
        (None, None) => ResponseBody::Empty,
        (Some(_), Some(_)) => return Err("stderr and stderr_file both set".to_string()),
    };
    let delay = r
        .delay
        .map(|d| cli_replay_core::parse_duration(&d).map_err(|e| e.to_string()))
        .transpose()?;
    Ok(Response {
        exit: r.exit.clamp(0, 255) as u8,
        stdout,
        stderr,
        capture: r.capture.into_iter().collect(),
        delay,
    })
}

/// `RawResponse` has no blanket `Default` because `exit`'s production
/// default is meaningful (0), unlike a step missing `respond` entirely
/// (a validation error caught upstream; this only needs to not panic).
trait RawResponseExt {
    fn unwrap_or_default_response(self) -> RawResponse;
}

impl RawResponseExt for Option<RawResponse> {
    fn unwrap_or_default_response(self) -> RawResponse {
        self.unwrap_or(RawResponse {
            exit: 0,
            stdout: None,
            stdout_file: None,
            stderr: None,
            stderr_file: None,
            capture: Default::default(),
            delay: None,
        })
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;
