// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compound duration parsing for scenario fields (`meta.session.ttl`,
//! `respond.delay`, `--max-delay`): sequences of `<number><unit>` like
//! `"30s"`, `"500ms"`, `"1h30m"`.

use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration {0:?}")]
    Invalid(String),
}

/// Parses a compound duration string such as `"1h30m"` or `"250ms"`.
///
/// Recognised units: `ms`, `s`, `m`, `h`, `d`. A bare number with no unit is
/// rejected rather than guessed, matching the scenario format's strict-field
/// posture elsewhere.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    let mut total = Duration::ZERO;
    let mut pos = 0usize;
    let mut saw_any = false;
    let bytes = s.as_bytes();
    while pos < bytes.len() {
        let num_start = pos;
        while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
            pos += 1;
        }
        if pos == num_start {
            return Err(DurationParseError::Invalid(input.to_string()));
        }
        let num_str = &s[num_start..pos];
        let unit_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let unit = &s[unit_start..pos];
        let value: f64 = num_str
            .parse()
            .map_err(|_| DurationParseError::Invalid(input.to_string()))?;
        let unit_secs = match unit {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            "d" => value * 86_400.0,
            other => {
                return Err(DurationParseError::Invalid(format!(
                    "unknown unit {other:?} in {input:?}"
                )))
            }
        };
        total += Duration::from_secs_f64(unit_secs.max(0.0));
        saw_any = true;
    }
    if !saw_any {
        return Err(DurationParseError::Invalid(input.to_string()));
    }
    Ok(total)
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
