// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr exec <scenario> -- <command...>` — the Session Manager: runs a
//! single child with an intercept directory prepended to its `PATH`,
//! forwards termination signals to it, cleans up unconditionally, and
//! optionally reports on the resulting session state.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use cli_replay_core::Scenario;
use cli_replay_session::{exit_code_for, intercepted_commands, InterceptDir, Supervised};

use super::support::{absolute, allowlist_gaps, emit_report, FormatArg};

#[derive(Args)]
pub struct ExecArgs {
    /// Scenario file to intercept commands against.
    pub scenario: PathBuf,

    /// Session id (defaults to "default", matching the Intercept Entry
    /// Point's own fallback).
    #[arg(long, default_value = "default")]
    pub session: String,

    /// Commands the caller additionally permits, beyond the scenario's own
    /// `meta.security.allowed_commands` (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub allowed_commands: Vec<String>,

    /// Report format to print after the child exits.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the post-run report to this path instead of the diagnostic
    /// stream.
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Caps every step's simulated `delay`, overriding `CLI_REPLAY_MAX_DELAY`.
    #[arg(long)]
    pub max_delay: Option<String>,

    /// Load and validate the scenario, print the planned step sequence, and
    /// exit 0 without spawning anything.
    #[arg(long)]
    pub dry_run: bool,

    /// The command (and its arguments) to run under interception.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn execute(args: ExecArgs) -> Result<i32> {
    let scenario_path = absolute(&args.scenario)?;
    let scenario = cli_replay_loader::load(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;

    let gaps = allowlist_gaps(&scenario, &args.allowed_commands);
    if !gaps.is_empty() {
        bail!("commands not covered by the effective allowlist: {}", gaps.join(", "));
    }

    if args.dry_run {
        print_planned_steps(&scenario);
        return Ok(0);
    }

    if let Some(session_meta) = &scenario.meta.session {
        let state_dir = cli_replay_state::state_dir(&scenario_path);
        cli_replay_state::sweep(&state_dir, session_meta.ttl, &cli_replay_core::SystemClock);
    }

    let commands = intercepted_commands(&scenario);
    let binary = std::env::current_exe().context("resolving this binary's path")?;
    let intercept_root =
        std::env::temp_dir().join(format!("cli-replay-exec-{}-{}", args.session, std::process::id()));
    let intercept_dir = InterceptDir::create(&intercept_root, &commands, &binary)
        .context("setting up intercept directory")?;

    let mut cmd = Command::new(&args.command[0]);
    cmd.args(&args.command[1..]);
    cmd.env(
        "PATH",
        cli_replay_session::prepend_path(&intercept_dir.path, std::env::var("PATH").ok().as_deref()),
    );
    cmd.env("CLI_REPLAY_SCENARIO", &scenario_path);
    cmd.env("CLI_REPLAY_SESSION", &args.session);
    if let Some(max_delay) = &args.max_delay {
        cmd.env("CLI_REPLAY_MAX_DELAY", max_delay);
    }
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let supervised = match cli_replay_session::spawn(cmd) {
        Ok(s) => s,
        Err(e) => {
            intercept_dir.remove();
            let code = match e.kind() {
                std::io::ErrorKind::NotFound => 127,
                std::io::ErrorKind::PermissionDenied => 126,
                _ => return Err(e).context(format!("spawning {:?}", args.command[0])),
            };
            eprintln!("error: spawning {:?}: {e}", args.command[0]);
            return Ok(code);
        }
    };

    let exit_code = run_and_wait(supervised);
    intercept_dir.remove();
    let child_exit_code = exit_code?;

    let state_path = cli_replay_state::path_for(&scenario_path, &args.session);
    let state = cli_replay_state::read(&state_path)
        .with_context(|| format!("reading state at {}", state_path.display()))?;
    let result = cli_replay_engine::verify(&scenario, state.as_ref());

    if args.format.is_some() || args.report_file.is_some() {
        emit_report(&result, args.format, args.report_file.as_deref())?;
    }

    let exit_code = if child_exit_code != 0 {
        child_exit_code
    } else if !result.passed {
        1
    } else {
        0
    };

    Ok(exit_code)
}

/// Dumps the flattened step sequence a `--dry-run` stops short of running.
fn print_planned_steps(scenario: &Scenario) {
    let flat = scenario.flatten();
    println!(
        "scenario {:?}: {} step(s) planned",
        scenario.meta.name,
        flat.steps.len()
    );
    for flat_step in &flat.steps {
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
        println!(
            "  step {}: {label} (calls {}..={})",
            flat_step.index, flat_step.step.calls.min, flat_step.step.calls.max
        );
    }
}

#[cfg(unix)]
fn run_and_wait(mut supervised: Supervised) -> Result<i32> {
    use nix::sys::signal::Signal;
    use signal_hook::consts::{SIGINT, SIGTERM};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let sigint = Arc::new(AtomicBool::new(false));
    let sigterm = Arc::new(AtomicBool::new(false));
    // Best-effort: if registration fails the child still runs to completion,
    // it just won't be torn down early on Ctrl-C.
    let _ = signal_hook::flag::register(SIGINT, Arc::clone(&sigint));
    let _ = signal_hook::flag::register(SIGTERM, Arc::clone(&sigterm));

    loop {
        match supervised.try_wait() {
            Ok(Some(status)) => return Ok(exit_code_for(&status)),
            Ok(None) => {}
            Err(e) => {
                supervised.cleanup();
                return Err(e).context("waiting for child");
            }
        }
        if sigint.swap(false, Ordering::Relaxed) {
            supervised.forward_signal(Signal::SIGINT);
        }
        if sigterm.swap(false, Ordering::Relaxed) {
            supervised.forward_signal(Signal::SIGTERM);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[cfg(windows)]
fn run_and_wait(mut supervised: Supervised) -> Result<i32> {
    match supervised.wait() {
        Ok(status) => Ok(exit_code_for(&status)),
        Err(e) => {
            supervised.cleanup();
            Err(e).context("waiting for child")
        }
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
