// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cli_replay_core::ArgvToken;
use std::sync::Arc;

fn pattern(tokens: Vec<ArgvToken>, stdin: Option<&str>) -> MatchPattern {
    MatchPattern {
        argv: tokens,
        stdin: stdin.map(|s| s.to_string()),
    }
}

fn lit(s: &str) -> ArgvToken {
    ArgvToken::Literal(s.to_string())
}

fn argv(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn exact_literal_match() {
    let p = pattern(vec![lit("kubectl"), lit("get"), lit("pods")], None);
    assert_eq!(
        matches(&p, &argv(&["kubectl", "get", "pods"]), None),
        MatchOutcome::Match
    );
}

#[test]
fn length_mismatch_is_reported() {
    let p = pattern(vec![lit("kubectl"), lit("get")], None);
    let outcome = matches(&p, &argv(&["kubectl"]), None);
    assert_eq!(
        outcome,
        MatchOutcome::Mismatch(MismatchDetail::LengthDiff {
            expected: 2,
            received: 1
        })
    );
}

#[test]
fn wildcard_matches_any_single_element() {
    let p = pattern(vec![lit("kubectl"), ArgvToken::Wildcard], None);
    assert!(matches(&p, &argv(&["kubectl", "anything"]), None).is_match());
}

#[test]
fn regex_token_matches_whole_element_only() {
    let regex_token = ArgvToken::Regex {
        source: "pod-[a-z0-9]+".to_string(),
        pattern: Arc::new(regex::Regex::new("^(?:pod-[a-z0-9]+)$").unwrap()),
    };
    let p = pattern(vec![regex_token], None);
    assert!(matches(&p, &argv(&["pod-abc123"]), None).is_match());
    assert!(!matches(&p, &argv(&["xpod-abc123x"]), None).is_match());
}

#[test]
fn literal_mismatch_reports_index_and_values() {
    let p = pattern(vec![lit("kubectl"), lit("get")], None);
    let outcome = matches(&p, &argv(&["kubectl", "delete"]), None);
    assert_eq!(
        outcome,
        MatchOutcome::Mismatch(MismatchDetail::ArgvElement {
            index: 1,
            expected: "get".to_string(),
            received: "delete".to_string(),
        })
    );
}

#[test]
fn stdin_ignored_when_pattern_has_none() {
    let p = pattern(vec![lit("a")], None);
    assert!(matches(&p, &argv(&["a"]), Some(b"whatever")).is_match());
}

#[test]
fn stdin_compared_with_crlf_normalization() {
    let p = pattern(vec![lit("a")], Some("line1\nline2\n"));
    assert!(matches(&p, &argv(&["a"]), Some(b"line1\r\nline2\r\n")).is_match());
}

#[test]
fn stdin_mismatch_is_reported() {
    let p = pattern(vec![lit("a")], Some("expected"));
    let outcome = matches(&p, &argv(&["a"]), Some(b"actual"));
    assert!(matches!(outcome, MatchOutcome::Mismatch(MismatchDetail::Stdin { .. })));
}

#[test]
fn normalize_stdin_caps_at_one_mebibyte() {
    let huge = vec![b'x'; MAX_STDIN_BYTES + 10];
    assert_eq!(normalize_stdin(&huge).len(), MAX_STDIN_BYTES);
}
