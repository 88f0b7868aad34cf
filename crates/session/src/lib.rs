// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cli-replay-session: the `exec` lifecycle's process/platform layer —
//! intercept directory setup and process-group/job-object child
//! supervision. Orchestration of the lifecycle's phases lives in the
//! `cli-replay` binary crate's `commands::exec`, which is the natural home
//! for the CLI-facing pre-flight/cleanup sequencing; this crate owns only
//! the parts that touch the OS directly.

pub mod error;
pub mod intercept;
pub mod supervisor;

pub use error::SessionError;
pub use intercept::{intercepted_commands, prepend_path, InterceptDir};
pub use supervisor::{exit_code_for, spawn, Supervised, CLEANUP_GRACE};
