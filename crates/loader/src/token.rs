// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argv token grammar. Three forms, checked in this order:
//!
//! - `*` — the wildcard sentinel, matches any single argv element.
//! - `~<pattern>~` — a regex token; `<pattern>` is compiled anchored
//!   (`^(?:<pattern>)$`) so a match always spans the whole element.
//! - anything else — a literal, matched by exact string equality.

use std::sync::Arc;

use cli_replay_core::ArgvToken;
use regex::Regex;

pub fn parse_token(raw: &str) -> Result<ArgvToken, String> {
    if raw == "*" {
        return Ok(ArgvToken::Wildcard);
    }
    if raw.len() >= 2 && raw.starts_with('~') && raw.ends_with('~') {
        let source = &raw[1..raw.len() - 1];
        let anchored = format!("^(?:{source})$");
        let pattern = Regex::new(&anchored).map_err(|e| e.to_string())?;
        return Ok(ArgvToken::Regex {
            source: source.to_string(),
            pattern: Arc::new(pattern),
        });
    }
    Ok(ArgvToken::Literal(raw.to_string()))
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
