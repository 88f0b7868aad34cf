// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use cli_replay_render::RenderError;

use crate::matcher::MismatchDetail;

/// One candidate the matcher tried and rejected, kept for mismatch
/// diagnostics — all eligible expectations in a group are kept, not
/// just the first.
#[derive(Debug, Clone)]
pub struct StepExpectation {
    pub index: usize,
    pub group: Option<String>,
    pub argv: Vec<String>,
    pub detail: Option<MismatchDetail>,
}

#[derive(Debug, Clone)]
pub struct MismatchDiagnostic {
    pub scenario_name: String,
    pub received_argv: Vec<String>,
    pub expectations: Vec<StepExpectation>,
}

impl std::fmt::Display for MismatchDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "scenario {:?}: no step matched received argv {:?}",
            self.scenario_name, self.received_argv
        )?;
        if self.expectations.is_empty() {
            writeln!(f, "  (scenario has no remaining eligible steps)")?;
        }
        for exp in &self.expectations {
            let group_prefix = exp
                .group
                .as_ref()
                .map(|g| format!("[group:{g}] "))
                .unwrap_or_default();
            writeln!(
                f,
                "  {group_prefix}step {}: expected argv {:?}",
                exp.index, exp.argv
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("command {command:?} is not in the scenario's allowed_commands list")]
    NotAllowed { command: String },

    #[error("{0}")]
    Mismatch(MismatchDiagnostic),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("failed to read response file {path}: {source}")]
    ResponseFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
