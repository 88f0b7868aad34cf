// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr init <scenario>` — resets a session's state without touching the
//! intercept directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::support::absolute;

#[derive(Args)]
pub struct InitArgs {
    /// Scenario file whose session state should be reset.
    pub scenario: PathBuf,

    /// Session id to reset (defaults to "default").
    #[arg(long, default_value = "default")]
    pub session: String,
}

pub fn execute(args: InitArgs) -> Result<i32> {
    let scenario_path = absolute(&args.scenario)?;
    // Loading validates the scenario exists and parses cleanly before we
    // touch any state, per the Loader's no-surprises contract.
    cli_replay_loader::load(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;

    let state_path = cli_replay_state::path_for(&scenario_path, &args.session);
    cli_replay_state::delete(&state_path)
        .with_context(|| format!("removing state at {}", state_path.display()))?;

    eprintln!("session {:?} reset for {}", args.session, scenario_path.display());
    Ok(0)
}
