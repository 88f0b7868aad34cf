// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use cli_replay_engine::EngineError;
use cli_replay_loader::LoadError;
use cli_replay_state::StateError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("command {command:?} (used in the scenario) is not covered by the effective allowlist")]
    AllowlistGap { command: String },

    #[error("failed to set up intercept directory at {path}: {source}")]
    InterceptSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn child {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for child: {0}")]
    Wait(#[source] std::io::Error),
}
