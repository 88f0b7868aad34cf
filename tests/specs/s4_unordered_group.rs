//! S4 — unordered group barrier.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s4-group-barrier
steps:
  - group:
      mode: unordered
      name: preflight
      steps:
        - match:
            argv: ["az", "account", "show"]
          respond:
            exit: 0
            stdout: "AZ\n"
        - match:
            argv: ["docker", "info"]
          respond:
            exit: 0
            stdout: "DK\n"
        - match:
            argv: ["kubectl", "cluster-info"]
          respond:
            exit: 0
            stdout: "KC\n"
  - match:
      argv: ["kubectl", "apply", "-f", "app.yaml"]
    respond:
      exit: 0
      stdout: "D\n"
"#;

#[test]
fn group_members_match_in_any_order_and_then_the_barrier_step_runs() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    let session = "s4";

    let calls: [&[&str]; 4] = [
        &["docker", "info"],
        &["kubectl", "cluster-info"],
        &["az", "account", "show"],
        &["kubectl", "apply", "-f", "app.yaml"],
    ];
    for argv in calls {
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

    let report_path = project.path().join("report.xml");
    let verify = project
        .clr()
        .args([
            "verify",
            scenario.to_str().unwrap(),
            "--session",
            session,
            "--format",
            "junit",
            "--report-file",
        ])
        .arg(&report_path)
        .output()
        .expect("run clr verify");
    assert!(verify.status.success());

    let junit = std::fs::read_to_string(&report_path).expect("read junit report");
    assert!(junit.contains("[group:preflight]"), "junit report: {junit}");

    let verify_json = project
        .clr()
        .args(["verify", scenario.to_str().unwrap(), "--session", session, "--format", "json"])
        .output()
        .expect("run clr verify json");
    let report: serde_json::Value =
        serde_json::from_slice(&verify_json.stderr).expect("verify report is valid json");
    assert_eq!(report["passed"], true);
}
