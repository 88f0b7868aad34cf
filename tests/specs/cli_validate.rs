//! `clr validate` — dry, side-effect-free loading across several malformed
//! and well-formed scenario shapes.

use yare::parameterized;

use crate::prelude::Project;

const SCENARIO_OK: &str = r#"
meta:
  name: validate-ok
steps:
  - match:
      argv: ["kubectl", "get", "pods"]
    respond:
      exit: 0
      stdout: "OK\n"
"#;

const SCENARIO_NO_STEPS: &str = r#"
meta:
  name: validate-empty
steps: []
"#;

const SCENARIO_BAD_BOUNDS: &str = r#"
meta:
  name: validate-bad-bounds
steps:
  - match:
      argv: ["a"]
    calls:
      min: 3
      max: 1
    respond:
      exit: 0
"#;

const SCENARIO_UNKNOWN_FIELD: &str = r#"
meta:
  name: validate-unknown-field
  bogus: true
steps:
  - match:
      argv: ["a"]
    respond:
      exit: 0
"#;

#[parameterized(
    well_formed_scenario_is_accepted = { SCENARIO_OK, true },
    scenario_with_no_steps_is_rejected = { SCENARIO_NO_STEPS, false },
    scenario_with_inverted_call_bounds_is_rejected = { SCENARIO_BAD_BOUNDS, false },
    scenario_with_an_unknown_field_is_rejected = { SCENARIO_UNKNOWN_FIELD, false },
)]
fn validate_reports_the_expected_outcome(contents: &str, should_pass: bool) {
    let project = Project::new();
    let scenario = project.scenario("scenario.yaml", contents);

    let output = project
        .clr()
        .args(["validate", scenario.to_str().unwrap()])
        .output()
        .expect("run clr validate");

    assert_eq!(
        output.status.success(),
        should_pass,
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn validate_json_reports_one_entry_per_file_without_touching_anything() {
    let project = Project::new();
    let ok = project.scenario("ok.yaml", SCENARIO_OK);
    let bad = project.scenario("bad.yaml", SCENARIO_NO_STEPS);

    let before = std::fs::read_to_string(&ok).expect("read ok.yaml before validate");

    let output = project
        .clr()
        .args(["validate", "--json", ok.to_str().unwrap(), bad.to_str().unwrap()])
        .output()
        .expect("run clr validate --json");

    assert_eq!(output.status.code(), Some(1));
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate --json emits a json array");
    let entries = entries.as_array().expect("array of entries");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["valid"], true);
    assert_eq!(entries[1]["valid"], false);
    assert!(!entries[1]["errors"].as_array().expect("errors array").is_empty());

    // Validating must not mutate the files it inspects.
    let after = std::fs::read_to_string(&ok).expect("read ok.yaml after validate");
    similar_asserts::assert_eq!(before, after);
}
