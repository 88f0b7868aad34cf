// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr record -o <scenario> --commands <names> -- <harness...>` — runs a
//! real command with an intercept directory wired to the JSONL-writing
//! recorder adapter ([`crate::record_intercept`]), then converts the log to
//! a scenario sharing the same model the replay engine consumes. Exit
//! codes: 0 success, 2 harness failure with a scenario still written, 3
//! scenario-generation failure.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use clap::Args;
use cli_replay_session::{exit_code_for, prepend_path, InterceptDir};
use serde::Serialize;

use super::support::absolute;
use crate::record_intercept::{RecordedCall, RECORD_LOG_VAR, RECORD_REAL_PATH_VAR};

#[derive(Args)]
pub struct RecordArgs {
    /// Path to write the generated scenario to.
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Scenario `meta.name` for the generated file.
    #[arg(long, default_value = "recorded")]
    pub name: String,

    /// Command basenames to intercept and record (comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    pub commands: Vec<String>,

    /// The harness command to run while recording.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn execute(args: RecordArgs) -> Result<i32> {
    let output_path = absolute(&args.output)?;
    let log_path = std::env::temp_dir().join(format!("cli-replay-record-{}.jsonl", std::process::id()));
    let real_path = std::env::var("PATH").unwrap_or_default();

    let commands: std::collections::BTreeSet<String> = args.commands.iter().cloned().collect();
    let binary = std::env::current_exe().context("resolving this binary's path")?;
    let intercept_root = std::env::temp_dir().join(format!("cli-replay-record-intercept-{}", std::process::id()));
    let intercept_dir = InterceptDir::create(&intercept_root, &commands, &binary)
        .context("setting up intercept directory")?;

    let mut cmd = Command::new(&args.command[0]);
    cmd.args(&args.command[1..]);
    cmd.env("PATH", prepend_path(&intercept_dir.path, Some(&real_path)));
    cmd.env(RECORD_LOG_VAR, &log_path);
    cmd.env(RECORD_REAL_PATH_VAR, &real_path);
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let harness_result = cli_replay_session::spawn(cmd)
        .context("spawning the recording harness")
        .and_then(|mut supervised| supervised.wait().context("waiting for the recording harness"));
    intercept_dir.remove();
    let harness_status = harness_result?;
    let harness_exit = exit_code_for(&harness_status);

    let records = read_log(&log_path).unwrap_or_default();
    std::fs::remove_file(&log_path).ok();

    match write_scenario(&output_path, &args.name, &records) {
        Ok(()) => {
            if let Err(e) = cli_replay_loader::load(&output_path) {
                eprintln!("recorded scenario failed validation: {e}");
                return Ok(3);
            }
            eprintln!(
                "wrote {} step(s) to {}",
                records.len(),
                output_path.display()
            );
            Ok(if harness_exit == 0 { 0 } else { 2 })
        }
        Err(e) => {
            eprintln!("failed to generate scenario: {e}");
            Ok(3)
        }
    }
}

fn read_log(path: &std::path::Path) -> Result<Vec<RecordedCall>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading recording log {}", path.display()))?;
    contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).with_context(|| format!("parsing recording log line: {line}"))
        })
        .collect()
}

#[derive(Serialize)]
struct OutScenario {
    meta: OutMeta,
    steps: Vec<OutStepElement>,
}

#[derive(Serialize)]
struct OutMeta {
    name: String,
}

#[derive(Serialize)]
struct OutStepElement {
    r#match: OutMatch,
    respond: OutRespond,
    calls: OutCalls,
}

#[derive(Serialize)]
struct OutMatch {
    argv: Vec<String>,
}

#[derive(Serialize)]
struct OutRespond {
    exit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
}

#[derive(Serialize)]
struct OutCalls {
    min: u32,
    max: u32,
}

/// Converts recorded calls to a scenario, preserving order and
/// duplicates — one step per call, no grouping or deduplication.
fn write_scenario(path: &std::path::Path, name: &str, records: &[RecordedCall]) -> Result<()> {
    let steps = records
        .iter()
        .map(|r| OutStepElement {
            r#match: OutMatch {
                argv: r.argv.clone(),
            },
            respond: OutRespond {
                exit: r.exit as i64,
                stdout: non_empty(lossy_text(&r.stdout, r.stdout_base64)),
                stderr: non_empty(lossy_text(&r.stderr, r.stderr_base64)),
            },
            calls: OutCalls { min: 1, max: 1 },
        })
        .collect();

    let scenario = OutScenario {
        meta: OutMeta { name: name.to_string() },
        steps,
    };
    let yaml = serde_yaml::to_string(&scenario).context("serialising the recorded scenario")?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))
}

fn lossy_text(captured: &str, base64_encoded: bool) -> String {
    if !base64_encoded {
        return captured.to_string();
    }
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    match BASE64.decode(captured) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
