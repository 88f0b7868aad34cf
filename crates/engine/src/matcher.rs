// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Matcher: decides whether an incoming argv (and
//! optional stdin) satisfies a step's `match` pattern.

use cli_replay_core::MatchPattern;

/// At most 1 MiB of stdin is ever considered.
pub const MAX_STDIN_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    Mismatch(MismatchDetail),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Match)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchDetail {
    LengthDiff { expected: usize, received: usize },
    ArgvElement { index: usize, expected: String, received: String },
    Stdin { expected: String, received: String },
}

/// Normalises captured stdin: cap at 1 MiB, CRLF -> LF.
pub fn normalize_stdin(bytes: &[u8]) -> String {
    let capped_len = bytes.len().min(MAX_STDIN_BYTES);
    let text = String::from_utf8_lossy(&bytes[..capped_len]);
    text.replace("\r\n", "\n")
}

fn strip_one_trailing_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

/// Decides whether `pattern` matches `argv` (and, when set, `stdin`).
///
/// Allocation-free on the literal-token hot path: argv elements are
/// compared by `&str` equality without intermediate String construction.
pub fn matches(pattern: &MatchPattern, argv: &[String], stdin: Option<&[u8]>) -> MatchOutcome {
    if pattern.argv.len() != argv.len() {
        return MatchOutcome::Mismatch(MismatchDetail::LengthDiff {
            expected: pattern.argv.len(),
            received: argv.len(),
        });
    }

    for (i, (token, value)) in pattern.argv.iter().zip(argv.iter()).enumerate() {
        if !token.matches(value) {
            return MatchOutcome::Mismatch(MismatchDetail::ArgvElement {
                index: i,
                expected: token.display(),
                received: value.clone(),
            });
        }
    }

    if let Some(expected_stdin) = &pattern.stdin {
        let received = normalize_stdin(stdin.unwrap_or(&[]));
        let expected_norm = strip_one_trailing_newline(&expected_stdin.replace("\r\n", "\n"));
        let received_norm = strip_one_trailing_newline(&received);
        if expected_norm != received_norm {
            return MatchOutcome::Mismatch(MismatchDetail::Stdin {
                expected: expected_norm.to_string(),
                received: received_norm.to_string(),
            });
        }
    }

    MatchOutcome::Match
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
