// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `main()`'s single seam between `anyhow::Result` command bodies and
//! the process exit-code taxonomy: every command returns the exit code it
//! intends on success; an `Err` is an unexpected failure and always maps to
//! 1 after its message is printed to the diagnostic stream.

/// Resolves a command's result into a process exit code.
pub fn resolve(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}
