// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Verifier/Reporter: turns a Scenario + final State into a
//! structured pass/fail result, serialisable as text, JSON, or JUnit XML.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

use cli_replay_core::{Scenario, State};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepResult {
    pub index: usize,
    pub label: String,
    pub group: String,
    pub call_count: u32,
    pub min: u32,
    pub max: u32,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VerifyResult {
    pub scenario_name: String,
    pub passed: bool,
    pub total_steps: usize,
    pub consumed_steps: usize,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Builds the verification result for a completed (or missing) session.
///
/// `state` is `None` when no state file exists for the session — that
/// populates `error` rather than failing to produce a result at all, so
/// `verify` always returns something serialisable.
pub fn verify(scenario: &Scenario, state: Option<&State>) -> VerifyResult {
    let Some(state) = state else {
        return VerifyResult {
            scenario_name: scenario.meta.name.clone(),
            passed: false,
            total_steps: scenario.total_steps(),
            consumed_steps: 0,
            steps: Vec::new(),
            error: Some("no state exists for this session".to_string()),
        };
    };

    let flat = scenario.flatten();
    let mut steps = Vec::with_capacity(flat.steps.len());
    let mut consumed_steps = 0;
    let mut passed = true;

    for flat_step in &flat.steps {
        let idx = flat_step.index;
        let count = state.step_counts.get(idx).copied().unwrap_or(0);
        let min = flat_step.step.calls.min;
        let max = flat_step.step.calls.max;
        let step_passed = count >= min;
        if !step_passed {
            passed = false;
        }
        if count > 0 {
            consumed_steps += 1;
        }
        let argv_label = flat_step
            .step
            .r#match
            .argv
            .iter()
            .map(|t| t.display())
            .collect::<Vec<_>>()
            .join(" ");
        let label = match flat_step.group {
            Some(group) => format!("[group:{group}] {argv_label}"),
            None => argv_label,
        };
        steps.push(StepResult {
            index: idx,
            label,
            group: flat_step.group.unwrap_or("").to_string(),
            call_count: count,
            min,
            max,
            passed: step_passed,
        });
    }

    VerifyResult {
        scenario_name: scenario.meta.name.clone(),
        passed,
        total_steps: flat.steps.len(),
        consumed_steps,
        steps,
        error: None,
    }
}

/// Human-readable rendering for the diagnostic stream.
pub fn to_text(result: &VerifyResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "scenario {:?}: {}\n",
        result.scenario_name,
        if result.passed { "PASSED" } else { "FAILED" }
    ));
    if let Some(err) = &result.error {
        out.push_str(&format!("  error: {err}\n"));
        return out;
    }
    out.push_str(&format!(
        "  {} / {} steps consumed\n",
        result.consumed_steps, result.total_steps
    ));
    for step in &result.steps {
        let mark = if step.passed { "ok" } else { "FAIL" };
        out.push_str(&format!(
            "  [{mark}] step {}: {} (called {}, expected {}..={})\n",
            step.index, step.label, step.call_count, step.min, step.max
        ));
    }
    out
}

/// Compact JSON rendering for stdout.
pub fn to_json(result: &VerifyResult) -> serde_json::Result<String> {
    serde_json::to_string(result)
}

/// One `<testsuite>` with one `<testcase>` per flattened step. Uncalled
/// optional steps (`min == 0`) render as `<skipped>`.
pub fn to_junit(result: &VerifyResult) -> quick_xml::Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::new(&mut buf);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let failures = result.steps.iter().filter(|s| !s.passed).count();
    let mut suite = BytesStart::new("testsuite");
    suite.push_attribute(("name", result.scenario_name.as_str()));
    suite.push_attribute(("tests", result.steps.len().to_string().as_str()));
    suite.push_attribute(("failures", failures.to_string().as_str()));
    writer.write_event(Event::Start(suite))?;

    for step in &result.steps {
        let mut case = BytesStart::new("testcase");
        case.push_attribute(("name", step.label.as_str()));
        case.push_attribute(("classname", result.scenario_name.as_str()));
        writer.write_event(Event::Start(case))?;

        if step.call_count == 0 && step.min == 0 {
            writer.write_event(Event::Empty(BytesStart::new("skipped")))?;
        } else if !step.passed {
            let message = format!(
                "step {} called {} time(s), expected at least {}",
                step.index, step.call_count, step.min
            );
            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", message.as_str()));
            writer.write_event(Event::Start(failure.clone()))?;
            writer.write_event(Event::Text(BytesText::new(&message)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    Ok(String::from_utf8(buf).expect("quick_xml only writes valid UTF-8"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    Junit,
}

/// Writes `result` in `format` to `sink` — the `--report-file`
/// destination, or the diagnostic stream when only `--format` is given.
pub fn write_report(
    result: &VerifyResult,
    format: ReportFormat,
    mut sink: impl Write,
) -> std::io::Result<()> {
    let rendered = match format {
        ReportFormat::Text => to_text(result),
        ReportFormat::Json => {
            to_json(result).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        }
        ReportFormat::Junit => {
            to_junit(result).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        }
    };
    sink.write_all(rendered.as_bytes())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
