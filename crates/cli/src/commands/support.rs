// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by more than one subcommand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cli_replay_core::Scenario;
use cli_replay_engine::{ReportFormat, VerifyResult};

/// `--format text|json|junit`, parsed by hand as a small `clap::ValueEnum`
/// rather than adding a `clap` dependency to `cli-replay-engine` just for
/// this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
    Junit,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Junit => ReportFormat::Junit,
        }
    }
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().context("reading current directory")?;
        Ok(cwd.join(path))
    }
}

/// Writes a verify report: `--report-file` always sends it there (default
/// `text` if `--format` was also omitted); otherwise `--format` alone sends
/// it to the diagnostic stream; neither flag emits nothing; stdout is
/// never touched (it is reserved for the intercepted child).
pub fn emit_report(
    result: &VerifyResult,
    format: Option<FormatArg>,
    report_file: Option<&Path>,
) -> Result<()> {
    match (format, report_file) {
        (_, Some(path)) => {
            let fmt: ReportFormat = format.unwrap_or(FormatArg::Text).into();
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating report file {}", path.display()))?;
            cli_replay_engine::write_report(result, fmt, file)
                .with_context(|| format!("writing report to {}", path.display()))?;
        }
        (Some(fmt), None) => {
            cli_replay_engine::write_report(result, fmt.into(), std::io::stderr())
                .context("writing report to the diagnostic stream")?;
        }
        (None, None) => {}
    }
    Ok(())
}

/// The command basenames the scenario intends to intercept that are *not*
/// covered by the effective allowlist (the intersection of the scenario's
/// own `allowed_commands` and any caller-supplied list); empty means every
/// command the scenario references is covered.
pub fn allowlist_gaps(scenario: &Scenario, caller_allowed: &[String]) -> Vec<String> {
    let commands = cli_replay_session::intercepted_commands(scenario);
    let scenario_allowed: Option<&[String]> = scenario
        .meta
        .security
        .as_ref()
        .map(|s| s.allowed_commands.as_slice())
        .filter(|v| !v.is_empty());

    commands
        .into_iter()
        .filter(|c| {
            let scenario_ok = match scenario_allowed {
                Some(allowed) => allowed.iter().any(|a| a == c),
                None => true,
            };
            let caller_ok = caller_allowed.is_empty() || caller_allowed.iter().any(|a| a == c);
            !(scenario_ok && caller_ok)
        })
        .collect()
}
