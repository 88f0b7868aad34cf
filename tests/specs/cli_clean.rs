//! `clr clean` / `clr init` — operator-invoked state management, exercised
//! without ever replaying anything.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: clean-target
steps:
  - match:
      argv: ["kubectl", "get", "pods"]
    respond:
      exit: 0
      stdout: "OK\n"
"#;

fn run_one_step(project: &Project, scenario: &std::path::Path, session: &str) {
    let output = project
        .clr()
        .arg("exec")
        .arg(scenario)
        .args(["--session", session, "--", "kubectl", "get", "pods"])
        .output()
        .expect("run clr exec");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn clean_removes_the_state_directory_next_to_the_scenario() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    run_one_step(&project, &scenario, "default");

    let state_dir = scenario.parent().expect("scenario has a parent dir").join(".cli-replay");
    assert!(state_dir.exists(), "state dir should exist after a successful exec");

    let output = project
        .clr()
        .args(["clean", scenario.to_str().unwrap()])
        .output()
        .expect("run clr clean");
    assert!(output.status.success());
    assert!(!state_dir.exists(), "clean should have removed the state directory");
}

#[test]
fn clean_with_session_only_removes_that_sessions_state() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    run_one_step(&project, &scenario, "keep-me");
    run_one_step(&project, &scenario, "remove-me");

    let output = project
        .clr()
        .args(["clean", scenario.to_str().unwrap(), "--session", "remove-me"])
        .output()
        .expect("run clr clean --session");
    assert!(output.status.success());

    let verify_removed = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", "remove-me", "--format", "json"])
        .output()
        .expect("verify removed session");
    let removed: serde_json::Value =
        serde_json::from_slice(&verify_removed.stderr).expect("json report");
    assert!(removed["error"].is_string(), "removed session should report no state");

    let verify_kept = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", "keep-me", "--format", "json"])
        .output()
        .expect("verify kept session");
    let kept: serde_json::Value = serde_json::from_slice(&verify_kept.stderr).expect("json report");
    assert_eq!(kept["passed"], true);
}

#[test]
fn init_resets_state_so_the_session_can_be_replayed_from_scratch() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    run_one_step(&project, &scenario, "default");

    let output = project
        .clr()
        .args(["init", scenario.to_str().unwrap()])
        .output()
        .expect("run clr init");
    assert!(output.status.success());

    // Step 0's single-call budget is available again after init.
    run_one_step(&project, &scenario, "default");

    let verify = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run clr verify");
    let report: serde_json::Value = serde_json::from_slice(&verify.stderr).expect("json report");
    assert_eq!(report["passed"], true);
    assert_eq!(report["consumed_steps"], 1);
}
