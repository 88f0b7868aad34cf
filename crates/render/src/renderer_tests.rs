// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn substitutes_top_level_variable() {
    let mut vars = BTreeMap::new();
    vars.insert("secret".to_string(), "xyz".to_string());
    let captures = BTreeMap::new();
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    assert_eq!(render("value={{.secret}}", &ctx).unwrap(), "value=xyz");
}

#[test]
fn substitutes_capture_reference() {
    let vars = BTreeMap::new();
    let mut captures = BTreeMap::new();
    captures.insert("rg_id".to_string(), "rg-xyz".to_string());
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    assert_eq!(
        render("VM in {{.capture.rg_id}}", &ctx).unwrap(),
        "VM in rg-xyz"
    );
}

#[test]
fn undefined_capture_resolves_to_empty_string() {
    let vars = BTreeMap::new();
    let captures = BTreeMap::new();
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    assert_eq!(render("[{{.capture.missing}}]", &ctx).unwrap(), "[]");
}

#[test]
fn undefined_top_level_variable_is_an_error() {
    let vars = BTreeMap::new();
    let captures = BTreeMap::new();
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    let err = render("{{.SECRET_KEY}}", &ctx).unwrap_err();
    assert_eq!(err, RenderError::UndefinedVariable("SECRET_KEY".to_string()));
}

#[test]
fn plain_text_without_placeholders_round_trips() {
    let vars = BTreeMap::new();
    let captures = BTreeMap::new();
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    assert_eq!(render("plain text\n", &ctx).unwrap(), "plain text\n");
}

#[test]
fn rendering_is_deterministic_given_same_context() {
    let mut vars = BTreeMap::new();
    vars.insert("a".to_string(), "1".to_string());
    let captures = BTreeMap::new();
    let ctx = RenderContext {
        vars: &vars,
        captures: &captures,
    };
    let first = render("{{.a}}-{{.a}}", &ctx).unwrap();
    let second = render("{{.a}}-{{.a}}", &ctx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn effective_delay_caps_to_maximum() {
    let requested = Duration::from_secs(10);
    let cap = Some(Duration::from_secs(2));
    assert_eq!(effective_delay(requested, cap), Duration::from_secs(2));
}

#[test]
fn effective_delay_uncapped_when_no_max() {
    let requested = Duration::from_millis(5);
    assert_eq!(effective_delay(requested, None), requested);
}
