// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal glob matching for `meta.security.deny_env_vars` patterns:
//! `*` matches any run of characters except separators. Environment
//! variable names never contain path separators, so in practice `*`
//! matches any run of characters.

pub fn glob_matches(pattern: &str, candidate: &str) -> bool {
    let regex_src = glob_to_regex(pattern);
    regex::Regex::new(&regex_src)
        .map(|re| re.is_match(candidate))
        .unwrap_or(false)
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            _ => {
                if matches!(
                    ch,
                    '.' | '+' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '\\'
                ) {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
#[path = "glob_tests.rs"]
mod tests;
