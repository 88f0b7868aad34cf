//! S6 — deny-env leakage suppression: a denied environment variable is
//! removed from the render context entirely, so a template referencing it
//! fails with an undefined-variable render error rather than leaking the
//! value; with tracing enabled the denial is logged by name only.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s6-deny-env
  vars:
    secret: "default"
  security:
    deny_env_vars: ["SECRET_*"]
steps:
  - match:
      argv: ["echo", "secret"]
    respond:
      exit: 0
      stdout: "{{.secret}} {{.SECRET_KEY}}"
"#;

#[test]
fn a_denied_env_var_renders_as_undefined_instead_of_leaking_its_value() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);

    let output = project
        .clr()
        .env("SECRET_KEY", "hunter2")
        .args(["exec", scenario.to_str().unwrap(), "--session", "s6", "--", "echo", "secret"])
        .output()
        .expect("run clr exec");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no response should have been emitted on a render error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SECRET_KEY"), "stderr: {stderr}");
    assert!(!stderr.contains("hunter2"), "the secret value must never appear: {stderr}");
}

#[test]
fn with_tracing_enabled_the_denial_is_logged_by_name_only() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);

    let output = project
        .clr()
        .env("SECRET_KEY", "hunter2")
        .env("CLI_REPLAY_TRACE", "1")
        .args(["exec", scenario.to_str().unwrap(), "--session", "s6-trace", "--", "echo", "secret"])
        .output()
        .expect("run clr exec");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("denied env var"), "stderr: {stderr}");
    assert!(stderr.contains("SECRET_KEY"), "stderr: {stderr}");
    assert!(!stderr.contains("hunter2"), "the secret value must never appear, even traced: {stderr}");
}
