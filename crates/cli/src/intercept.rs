// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Intercept Entry Point: the branch
//! `main()` takes when this binary is invoked under a non-primary name via
//! the intercept directory. Reads `CLI_REPLAY_SCENARIO` from the process
//! environment, re-synthesises the original argv with `argv[0]` replaced by
//! the bare intercepted command name, and delegates to the Replay Engine.

use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use cli_replay_core::{Clock, SystemClock};
use cli_replay_engine::{replay, Invocation, ReplayOptions, MAX_STDIN_BYTES};

/// The name this binary answers to as itself (not as an intercepted command).
pub const PRIMARY_NAME: &str = "clr";

/// cmd.exe/PowerShell wrappers cannot rewrite `argv[0]`, so they thread the
/// intercepted command name through this variable instead (see
/// `cli-replay-session::intercept::create_entry`'s Windows branch); Unix
/// symlinks preserve `argv[0]` and never need it.
const INTERCEPT_CMD_OVERRIDE: &str = "CLI_REPLAY_INTERCEPT_CMD";

/// The command name the caller invoked us as, honouring the Windows
/// wrapper's override before falling back to `argv[0]`'s basename.
pub fn invoked_command(argv0: &str) -> String {
    if let Ok(forced) = std::env::var(INTERCEPT_CMD_OVERRIDE) {
        if !forced.is_empty() {
            return forced;
        }
    }
    Path::new(argv0)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| argv0.to_string())
}

/// `Some(command)` when `argv0` means this process should act as an
/// intercepted command rather than the primary CLI.
pub fn should_intercept(argv0: &str) -> Option<String> {
    let name = invoked_command(argv0);
    if name == PRIMARY_NAME {
        None
    } else {
        Some(name)
    }
}

/// Runs one intercepted invocation end to end and returns the process exit
/// code: the matched step's `exit` on success, 1 otherwise.
pub fn run(command: &str, args: &[String]) -> i32 {
    let Ok(scenario_path) = std::env::var("CLI_REPLAY_SCENARIO") else {
        eprintln!(
            "{command}: CLI_REPLAY_SCENARIO is unset; this binary must run inside a `clr exec` session"
        );
        return 1;
    };
    let scenario_path = PathBuf::from(scenario_path);

    let scenario = match cli_replay_loader::load(&scenario_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{command}: failed to load scenario {}: {e}", scenario_path.display());
            return 1;
        }
    };

    let session_id = std::env::var("CLI_REPLAY_SESSION").unwrap_or_else(|_| "default".to_string());
    let trace = std::env::var("CLI_REPLAY_TRACE").as_deref() == Ok("1");
    let max_delay = std::env::var("CLI_REPLAY_MAX_DELAY")
        .ok()
        .and_then(|s| cli_replay_core::parse_duration(&s).ok());

    let state_path = cli_replay_state::path_for(&scenario_path, &session_id);
    let state = match cli_replay_state::read(&state_path) {
        Ok(Some(existing)) => {
            if existing.scenario_fingerprint != scenario.fingerprint() {
                eprintln!(
                    "{command}: scenario {} changed since this session started; reset state before continuing",
                    scenario_path.display()
                );
                return 1;
            }
            existing
        }
        Ok(None) => cli_replay_core::State::fresh(
            &scenario,
            scenario_path.clone(),
            session_id.clone(),
            SystemClock.now_ms(),
        ),
        Err(e) => {
            eprintln!("{command}: state file is corrupt: {e}");
            return 1;
        }
    };

    let mut full_argv = Vec::with_capacity(args.len() + 1);
    full_argv.push(command.to_string());
    full_argv.extend_from_slice(args);

    let stdin_bytes = read_stdin_if_piped();
    let scenario_dir = scenario_path.parent().unwrap_or_else(|| Path::new("."));
    let options = ReplayOptions {
        env: std::env::vars().collect(),
        max_delay,
        trace,
    };

    match replay(
        &scenario,
        &state,
        &Invocation {
            argv: &full_argv,
            stdin: stdin_bytes.as_deref(),
        },
        scenario_dir,
        &options,
    ) {
        Ok((mut new_state, outcome)) => {
            let _ = std::io::stdout().write_all(&outcome.stdout);
            let _ = std::io::stderr().write_all(&outcome.stderr);
            if let Err(e) = cli_replay_state::write(&state_path, &mut new_state, &SystemClock) {
                // the response is still emitted even if the write fails.
                tracing::warn!(error = %e, "failed to persist state after a successful response");
            }
            outcome.exit_code
        }
        Err(e) => {
            // on mismatch the state is not advanced at all.
            eprintln!("{e}");
            1
        }
    }
}

/// At most 1 MiB, and only when stdin isn't an interactive terminal — a
/// step's `match.stdin` is only known after matching, so intercept always
/// captures eagerly when input is available.
fn read_stdin_if_piped() -> Option<Vec<u8>> {
    if std::io::stdin().is_terminal() {
        return None;
    }
    let mut buf = Vec::new();
    let mut limited = std::io::stdin().take(MAX_STDIN_BYTES as u64);
    limited.read_to_end(&mut buf).ok()?;
    Some(buf)
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
