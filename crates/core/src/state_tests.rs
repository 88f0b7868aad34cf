// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::scenario::{ArgvToken, CallBounds, Meta, MatchPattern, Response, ResponseBody, Step, StepElement};

fn one_step_scenario() -> Scenario {
    Scenario {
        meta: Meta {
            name: "demo".to_string(),
            description: String::new(),
            vars: BTreeMap::new(),
            security: None,
            session: None,
        },
        steps: vec![StepElement::Step(Step {
            r#match: MatchPattern {
                argv: vec![ArgvToken::Literal("kubectl".to_string())],
                stdin: None,
            },
            respond: Response {
                exit: 0,
                stdout: ResponseBody::Empty,
                stderr: ResponseBody::Empty,
                capture: Vec::new(),
                delay: None,
            },
            calls: CallBounds::default(),
        })],
    }
}

#[test]
fn fresh_state_has_zeroed_counts() {
    let scenario = one_step_scenario();
    let state = State::fresh(&scenario, PathBuf::from("/tmp/s.yaml"), "sess-1".to_string(), 100);
    assert_eq!(state.total_steps, 1);
    assert_eq!(state.current_step, 0);
    assert_eq!(state.step_counts, vec![0]);
    assert!(!state.is_consumed());
}

#[test]
fn is_consumed_when_cursor_reaches_total() {
    let scenario = one_step_scenario();
    let mut state = State::fresh(&scenario, PathBuf::from("/tmp/s.yaml"), "sess-1".to_string(), 100);
    state.current_step = 1;
    assert!(state.is_consumed());
}

#[test]
fn respects_bounds_detects_violation() {
    let scenario = one_step_scenario();
    let mut state = State::fresh(&scenario, PathBuf::from("/tmp/s.yaml"), "sess-1".to_string(), 100);
    assert!(state.respects_bounds(&[1]));
    state.step_counts[0] = 2;
    assert!(!state.respects_bounds(&[1]));
}
