//! S2 — out-of-order mismatch.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s2-out-of-order
steps:
  - match:
      argv: ["a"]
    respond:
      exit: 0
      stdout: "A\n"
  - match:
      argv: ["b"]
    respond:
      exit: 0
      stdout: "B\n"
"#;

#[test]
fn running_the_second_step_first_is_a_mismatch_and_leaves_state_untouched() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);

    let output = project
        .clr()
        .args(["exec", scenario.to_str().unwrap(), "--session", "s2", "--", "b"])
        .output()
        .expect("run clr exec");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("s2-out-of-order"), "stderr: {stderr}");
    assert!(stderr.contains(r#"["b"]"#), "stderr: {stderr}");
    assert!(stderr.contains("step 0"), "stderr: {stderr}");
    assert!(stderr.contains(r#"["a"]"#), "stderr: {stderr}");

    let verify = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", "s2", "--format", "json"])
        .output()
        .expect("run clr verify");
    assert_eq!(verify.status.code(), Some(1));
    let report: serde_json::Value =
        serde_json::from_slice(&verify.stderr).expect("verify report is valid json");
    assert_eq!(report["passed"], false);
    assert_eq!(report["consumed_steps"], 0);
}
