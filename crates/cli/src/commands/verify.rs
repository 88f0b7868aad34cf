// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr verify <scenario>` — reports on a session's final state without
//! running anything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::support::{absolute, emit_report, FormatArg};

#[derive(Args)]
pub struct VerifyArgs {
    /// Scenario file the session was run against.
    pub scenario: PathBuf,

    /// Session id to verify (defaults to "default", matching the Intercept
    /// Entry Point's fallback).
    #[arg(long, default_value = "default")]
    pub session: String,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the report to this path instead of the diagnostic stream.
    #[arg(long)]
    pub report_file: Option<PathBuf>,
}

pub fn execute(args: VerifyArgs) -> Result<i32> {
    let scenario_path = absolute(&args.scenario)?;
    let scenario = cli_replay_loader::load(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;

    let state_path = cli_replay_state::path_for(&scenario_path, &args.session);
    let state = cli_replay_state::read(&state_path)
        .with_context(|| format!("reading state at {}", state_path.display()))?;

    let result = cli_replay_engine::verify(&scenario, state.as_ref());
    let passed = result.passed;

    // verify's entire purpose is to report, so default to text on stderr
    // even when neither --format nor --report-file was given.
    let format = args.format.or(Some(FormatArg::Text));
    emit_report(&result, format, args.report_file.as_deref())?;

    Ok(if passed { 0 } else { 1 })
}
