// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wildcard_sentinel() {
    assert!(matches!(parse_token("*").unwrap(), ArgvToken::Wildcard));
}

#[test]
fn regex_sentinel_compiles_anchored() {
    let token = parse_token("~demo-[a-z]+~").unwrap();
    match token {
        ArgvToken::Regex { source, pattern } => {
            assert_eq!(source, "demo-[a-z]+");
            assert!(pattern.is_match("demo-rg"));
            assert!(!pattern.is_match("xdemo-rgx"));
        }
        other => panic!("expected regex token, got {other:?}"),
    }
}

#[test]
fn literal_token() {
    assert!(matches!(parse_token("kubectl").unwrap(), ArgvToken::Literal(s) if s == "kubectl"));
}

#[test]
fn invalid_regex_is_an_error() {
    assert!(parse_token("~(unclosed~").is_err());
}
