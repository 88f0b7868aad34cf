// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup. `CLI_REPLAY_TRACE=1` raises the `cli_replay` target to
//! `debug`; everything goes to the diagnostic stream (stderr) so stdout
//! stays reserved for the intercepted child's own output.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let trace = std::env::var("CLI_REPLAY_TRACE").as_deref() == Ok("1");
    let directive = if trace {
        "cli_replay=debug,cli_replay_engine=debug,cli_replay_session=debug,cli_replay_render=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
