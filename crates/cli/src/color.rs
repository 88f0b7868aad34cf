// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Colour auto-detection: `CLI_REPLAY_COLOR`/`NO_COLOR`.

use std::io::IsTerminal;

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};

mod codes {
    pub const HEADER: u8 = 74;
    pub const LITERAL: u8 = 250;
    pub const CONTEXT: u8 = 245;
}

/// `NO_COLOR` (any value) disables; `CLI_REPLAY_COLOR=0|1` overrides the
/// TTY auto-detect either way; otherwise colour follows whether stderr (the
/// diagnostic stream colour applies to) is a terminal.
pub fn should_colorize() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("CLI_REPLAY_COLOR").as_deref() {
        Ok("0") => return false,
        Ok("1") => return true,
        _ => {}
    }
    std::io::stderr().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .usage(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
