// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Renderer: turns a `{{.path}}` template plus a
//! [`RenderContext`] into output bytes.

use std::collections::BTreeMap;
use std::time::Duration;

use regex::Regex;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("undefined variable {0:?}")]
    UndefinedVariable(String),
}

#[derive(Debug, Clone, Default)]
pub struct RenderContext<'a> {
    pub vars: &'a BTreeMap<String, String>,
    pub captures: &'a BTreeMap<String, String>,
}

fn placeholder_re() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{\{\.([A-Za-z_][A-Za-z0-9_]*)(?:\.([A-Za-z_][A-Za-z0-9_]*))?\}\}").unwrap()
}

/// Substitutes every `{{.name}}` / `{{.capture.id}}` placeholder.
///
/// `{{.capture.<id>}}` resolves to the empty string when `<id>` is
/// undefined (captures legitimately accumulate over a session); any other
/// undefined top-level variable is a render error.
pub fn render(template: &str, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let re = placeholder_re();
    let mut out = String::with_capacity(template.len());
    let mut last_end = 0;
    for caps in re.captures_iter(template) {
        let whole = caps.get(0).expect("group 0 always matches");
        out.push_str(&template[last_end..whole.start()]);
        let first = &caps[1];
        let value = if first == "capture" {
            let id = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            ctx.captures.get(id).cloned().unwrap_or_default()
        } else if caps.get(2).is_some() {
            // two-segment path with an unsupported namespace
            return Err(RenderError::UndefinedVariable(format!(
                "{first}.{}",
                &caps[2]
            )));
        } else {
            ctx.vars
                .get(first)
                .cloned()
                .ok_or_else(|| RenderError::UndefinedVariable(first.to_string()))?
        };
        out.push_str(&value);
        last_end = whole.end();
    }
    out.push_str(&template[last_end..]);
    Ok(out)
}

/// Applies the session-level `--max-delay` cap.
pub fn effective_delay(requested: Duration, cap: Option<Duration>) -> Duration {
    match cap {
        Some(cap) => requested.min(cap),
        None => requested,
    }
}

/// Suspends the calling thread for the (already-capped) response delay.
/// Called by the Replay Engine after bytes are produced and before they
/// are handed back to the caller, so observed timing matches the delay.
pub fn apply_delay(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
