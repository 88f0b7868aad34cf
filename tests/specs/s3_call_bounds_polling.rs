//! S3 — call bounds with polling + an optional step, auto soft-advance.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s3-polling
steps:
  - match:
      argv: ["k", "get", "pods"]
    calls:
      min: 1
      max: 3
    respond:
      exit: 0
      stdout: "P\n"
  - match:
      argv: ["k", "delete", "pod", "*"]
    calls:
      min: 0
      max: 1
    respond:
      exit: 0
      stdout: "O\n"
  - match:
      argv: ["k", "apply", "-f", "d.yaml"]
    respond:
      exit: 0
      stdout: "F\n"
"#;

#[test]
fn polling_step_soft_advances_past_the_unused_optional_step() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    let session = "s3";

    for argv in [["k", "get", "pods"], ["k", "get", "pods"], ["k", "apply", "-f", "d.yaml"]] {
        let output = project
            .clr()
            .arg("exec")
            .arg(&scenario)
            .args(["--session", session, "--"])
            .args(argv)
            .output()
            .expect("run clr exec");
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    let verify = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", session, "--format", "json"])
        .output()
        .expect("run clr verify");
    assert!(verify.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&verify.stderr).expect("verify report is valid json");
    assert_eq!(report["passed"], true);

    let steps = report["steps"].as_array().expect("steps array");
    assert_eq!(steps[0]["call_count"], 2, "polling step should have been consumed twice");
    assert_eq!(steps[1]["call_count"], 0, "optional step should have been skipped");
    assert_eq!(steps[2]["call_count"], 1);
}
