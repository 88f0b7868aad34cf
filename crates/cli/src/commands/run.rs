// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr run <scenario>` — the legacy "eval-the-output" workflow: sets up an
//! intercept session and prints shell code that wires `PATH` and the
//! `CLI_REPLAY_*` environment into the *caller's own* shell, so commands
//! typed directly at the prompt (not spawned as a single child) are
//! intercepted. `clr exec` is the modern, single-command equivalent;
//! `run` exists for interactive/script use where there is no single child
//! to supervise.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use super::support::{absolute, allowlist_gaps};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShellKind {
    Sh,
    Bash,
    Zsh,
    Pwsh,
    Cmd,
}

impl ShellKind {
    fn detect() -> Self {
        if cfg!(windows) {
            return ShellKind::Pwsh;
        }
        match std::env::var("SHELL") {
            Ok(s) if s.ends_with("zsh") => ShellKind::Zsh,
            Ok(s) if s.ends_with("bash") => ShellKind::Bash,
            _ => ShellKind::Sh,
        }
    }

    fn supports_trap(self) -> bool {
        matches!(self, ShellKind::Sh | ShellKind::Bash | ShellKind::Zsh)
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Scenario file to set up an intercept session for.
    pub scenario: PathBuf,

    /// Target shell for the emitted setup code (defaults to $SHELL).
    #[arg(long, value_enum)]
    pub shell: Option<ShellKind>,

    /// Session id to use (a fresh one is generated if omitted).
    #[arg(long)]
    pub session: Option<String>,

    /// Commands the caller additionally permits, beyond the scenario's own
    /// `meta.security.allowed_commands` (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub allowed_commands: Vec<String>,
}

pub fn execute(args: RunArgs) -> Result<i32> {
    let scenario_path = absolute(&args.scenario)?;
    let scenario = cli_replay_loader::load(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;

    let gaps = allowlist_gaps(&scenario, &args.allowed_commands);
    if !gaps.is_empty() {
        bail!("commands not covered by the effective allowlist: {}", gaps.join(", "));
    }

    let shell = args.shell.unwrap_or_else(ShellKind::detect);
    let session_id = args
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if let Some(session_meta) = &scenario.meta.session {
        let state_dir = cli_replay_state::state_dir(&scenario_path);
        cli_replay_state::sweep(&state_dir, session_meta.ttl, &cli_replay_core::SystemClock);
    }

    let intercept_root = std::env::temp_dir().join(format!("cli-replay-{session_id}"));
    let commands = cli_replay_session::intercepted_commands(&scenario);
    let binary = std::env::current_exe().context("resolving this binary's path")?;
    cli_replay_session::InterceptDir::create(&intercept_root, &commands, &binary)
        .context("setting up intercept directory")?;

    print_setup(shell, &scenario_path, &session_id, &intercept_root);
    Ok(0)
}

fn print_setup(shell: ShellKind, scenario_path: &std::path::Path, session_id: &str, intercept_dir: &std::path::Path) {
    match shell {
        ShellKind::Pwsh => {
            println!("$env:PATH = \"{};\" + $env:PATH", intercept_dir.display());
            println!("$env:CLI_REPLAY_SCENARIO = \"{}\"", scenario_path.display());
            println!("$env:CLI_REPLAY_SESSION = \"{session_id}\"");
            eprintln!("note: PowerShell has no trap-on-exit cleanup here; run `clr clean` when done");
        }
        ShellKind::Cmd => {
            println!("set PATH={};%PATH%", intercept_dir.display());
            println!("set CLI_REPLAY_SCENARIO={}", scenario_path.display());
            println!("set CLI_REPLAY_SESSION={session_id}");
            eprintln!("note: cmd.exe has no trap-on-exit cleanup here; run `clr clean` when done");
        }
        ShellKind::Sh | ShellKind::Bash | ShellKind::Zsh => {
            println!("export PATH=\"{}:$PATH\"", intercept_dir.display());
            println!("export CLI_REPLAY_SCENARIO=\"{}\"", scenario_path.display());
            println!("export CLI_REPLAY_SESSION=\"{session_id}\"");
            if shell.supports_trap() {
                println!("__cli_replay_cleanup_done=0");
                println!("__cli_replay_cleanup() {{");
                println!("  if [ \"$__cli_replay_cleanup_done\" = 1 ]; then return; fi");
                println!("  __cli_replay_cleanup_done=1");
                println!("  rm -rf \"{}\"", intercept_dir.display());
                println!("}}");
                println!("trap '__cli_replay_cleanup' EXIT INT TERM");
            }
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
