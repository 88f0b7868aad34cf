//! `clr record` — recording a harness's real invocations into a scenario,
//! preserving call order and duplicates, then replaying the generated
//! scenario back through `clr exec`.

use crate::prelude::Project;

#[test]
fn record_converts_a_harnesss_calls_into_a_loadable_scenario_preserving_order() {
    let project = Project::new();
    let output_path = project.path().join("recorded.yaml");

    let record = project
        .clr()
        .arg("record")
        .args(["-o", output_path.to_str().unwrap()])
        .args(["--name", "from-harness"])
        .args(["--commands", "echo"])
        .arg("--")
        .arg("sh")
        .args(["-c", "echo hi; echo hi; echo bye"])
        .output()
        .expect("run clr record");

    assert!(record.status.success(), "stderr: {}", String::from_utf8_lossy(&record.stderr));

    let yaml = std::fs::read_to_string(&output_path).expect("read recorded scenario");
    let scenario: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("recorded yaml parses");
    let steps = scenario["steps"].as_sequence().expect("steps sequence");
    assert_eq!(steps.len(), 3, "one step per call, duplicates not collapsed");
    assert_eq!(steps[0]["match"]["argv"][0].as_str(), Some("echo"));
    assert_eq!(steps[0]["match"]["argv"][1].as_str(), Some("hi"));
    assert_eq!(steps[1]["match"]["argv"][1].as_str(), Some("hi"));
    assert_eq!(steps[2]["match"]["argv"][1].as_str(), Some("bye"));

    // The recorded scenario replays the exact sequence it was recorded from.
    let replay_project = Project::new();
    let scenario_path = replay_project.scenario(
        "replay.yaml",
        &std::fs::read_to_string(&output_path).expect("reread recorded scenario"),
    );
    for word in ["hi", "hi", "bye"] {
        let exec = replay_project
            .clr()
            .arg("exec")
            .arg(&scenario_path)
            .args(["--session", "replay", "--", "echo", word])
            .output()
            .expect("replay recorded step");
        assert!(exec.status.success(), "stderr: {}", String::from_utf8_lossy(&exec.stderr));
    }
}

#[test]
fn record_surfaces_a_failing_harness_as_exit_code_two_while_still_writing_the_scenario() {
    let project = Project::new();
    let output_path = project.path().join("recorded.yaml");

    let record = project
        .clr()
        .arg("record")
        .args(["-o", output_path.to_str().unwrap()])
        .args(["--commands", "echo"])
        .arg("--")
        .arg("sh")
        .args(["-c", "echo hi; exit 5"])
        .output()
        .expect("run clr record");

    assert_eq!(record.status.code(), Some(2));
    assert!(output_path.exists(), "scenario should still be written on harness failure");
}
