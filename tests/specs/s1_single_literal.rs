//! S1 — single literal step, success.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s1-single-literal
steps:
  - match:
      argv: ["kubectl", "get", "pods"]
    respond:
      exit: 0
      stdout: "OK\n"
"#;

#[test]
fn exec_replays_the_canned_response_and_verify_reports_a_full_pass() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);

    let output = project
        .clr()
        .args(["exec", scenario.to_str().unwrap(), "--session", "s1", "--", "kubectl", "get", "pods"])
        .output()
        .expect("run clr exec");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    similar_asserts::assert_eq!(String::from_utf8_lossy(&output.stdout), "OK\n");

    let verify = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", "s1", "--format", "json"])
        .output()
        .expect("run clr verify");
    assert!(verify.status.success());
    // verify's report goes to the diagnostic stream; stdout stays empty.
    assert!(verify.stdout.is_empty());

    let report: serde_json::Value =
        serde_json::from_slice(&verify.stderr).expect("verify report is valid json");
    assert_eq!(report["passed"], true);
    assert_eq!(report["consumed_steps"], 1);
    assert_eq!(report["total_steps"], 1);
}
