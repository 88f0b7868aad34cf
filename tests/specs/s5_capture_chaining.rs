//! S5 — capture chaining: a value captured from one step's response is
//! rendered into a later step's template within the same session.

use crate::prelude::Project;

const SCENARIO: &str = r#"
meta:
  name: s5-capture-chaining
steps:
  - match:
      argv: ["az", "group", "create", "--name", "demo-rg", "--location", "eastus"]
    respond:
      exit: 0
      capture:
        rg_id: "rg-xyz"
  - match:
      argv: ["az", "vm", "create", "--resource-group", "demo-rg"]
    respond:
      exit: 0
      stdout: "VM in {{.capture.rg_id}}"
"#;

#[test]
fn a_later_step_renders_an_earlier_steps_capture() {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", SCENARIO);
    let session = "s5";

    let first = project
        .clr()
        .arg("exec")
        .arg(&scenario)
        .args(["--session", session, "--", "az", "group", "create", "--name", "demo-rg", "--location", "eastus"])
        .output()
        .expect("run first clr exec");
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));

    let second = project
        .clr()
        .arg("exec")
        .arg(&scenario)
        .args(["--session", session, "--", "az", "vm", "create", "--resource-group", "demo-rg"])
        .output()
        .expect("run second clr exec");
    assert!(second.status.success(), "stderr: {}", String::from_utf8_lossy(&second.stderr));
    similar_asserts::assert_eq!(String::from_utf8_lossy(&second.stdout), "VM in rg-xyz");
}
