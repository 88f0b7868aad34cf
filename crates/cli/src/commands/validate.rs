// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr validate <file>...` — the Loader exposed as a dry, side-effect-free
//! multi-file pre-flight check.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct ValidateArgs {
    /// Scenario files to check.
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Emit one JSON object per file instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ValidateArgs) -> Result<i32> {
    let results = cli_replay_loader::validate_files(&args.scenarios);
    let all_valid = results.iter().all(|r| r.valid);

    if args.json {
        #[derive(serde::Serialize)]
        struct Entry<'a> {
            path: &'a std::path::Path,
            valid: bool,
            errors: &'a [String],
        }
        let entries: Vec<Entry> = results
            .iter()
            .map(|r| Entry {
                path: &r.path,
                valid: r.valid,
                errors: &r.errors,
            })
            .collect();
        println!("{}", serde_json::to_string(&entries)?);
    } else {
        for r in &results {
            if r.valid {
                println!("{}: OK", r.path.display());
            } else {
                println!("{}: FAILED", r.path.display());
                for e in &r.errors {
                    println!("  - {e}");
                }
            }
        }
    }

    Ok(if all_valid { 0 } else { 1 })
}
