// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record-mode counterpart to [`crate::intercept::run`]: instead of
//! consulting a scenario, runs the real underlying command and appends one
//! JSONL line per invocation to the recorder's log. Reached from the
//! same `argv[0]` dispatch as replay mode, distinguished by
//! `CLI_REPLAY_RECORD_LOG` being set instead of `CLI_REPLAY_SCENARIO`.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cli_replay_core::{Clock, SystemClock};
use serde::{Deserialize, Serialize};

pub const RECORD_LOG_VAR: &str = "CLI_REPLAY_RECORD_LOG";
pub const RECORD_REAL_PATH_VAR: &str = "CLI_REPLAY_RECORD_REAL_PATH";

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordedCall {
    pub timestamp_ms: i64,
    pub argv: Vec<String>,
    pub exit: i32,
    pub stdout: String,
    pub stdout_base64: bool,
    pub stderr: String,
    pub stderr_base64: bool,
}

/// Runs `command` for real (resolved against the pre-interception `PATH`),
/// passes its output straight through, and appends a [`RecordedCall`] to the
/// log named by `CLI_REPLAY_RECORD_LOG`.
pub fn run(command: &str, args: &[String]) -> i32 {
    let Ok(log_path) = std::env::var(RECORD_LOG_VAR) else {
        eprintln!(
            "{command}: {RECORD_LOG_VAR} is unset; this binary must run inside a `clr record` session"
        );
        return 1;
    };
    let real_path = std::env::var(RECORD_REAL_PATH_VAR).unwrap_or_default();

    let Some(real_binary) = find_on_path(command, &real_path) else {
        eprintln!("{command}: not found on the real PATH while recording");
        return 127;
    };

    let output = match Command::new(&real_binary)
        .args(args)
        .env("PATH", &real_path)
        .stdin(Stdio::inherit())
        .output()
    {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{command}: failed to run {}: {e}", real_binary.display());
            return 1;
        }
    };

    let _ = std::io::stdout().write_all(&output.stdout);
    let _ = std::io::stderr().write_all(&output.stderr);

    let mut full_argv = Vec::with_capacity(args.len() + 1);
    full_argv.push(command.to_string());
    full_argv.extend_from_slice(args);

    let (stdout, stdout_base64) = encode(&output.stdout);
    let (stderr, stderr_base64) = encode(&output.stderr);
    let exit = output.status.code().unwrap_or(1);
    let record = RecordedCall {
        timestamp_ms: SystemClock.now_ms(),
        argv: full_argv,
        exit,
        stdout,
        stdout_base64,
        stderr,
        stderr_base64,
    };

    if let Err(e) = append_line(&log_path, &record) {
        eprintln!("{command}: failed to append to recording log {log_path}: {e}");
    }

    exit
}

fn encode(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (BASE64.encode(bytes), true),
    }
}

fn append_line(path: &str, record: &RecordedCall) -> std::io::Result<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

fn find_on_path(command: &str, path_var: &str) -> Option<PathBuf> {
    for dir in std::env::split_paths(path_var) {
        let candidate = dir.join(command);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{command}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "record_intercept_tests.rs"]
mod tests;
