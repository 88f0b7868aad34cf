// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clr` — the cli-replay binary. Dispatches on `argv[0]`: invoked under its
//! own name it is the operator-facing CLI; invoked under any other name
//! (via the intercept directory) it is the Intercept Entry Point that
//! consults a scenario, or — when recording — the real-command proxy in
//! [`record_intercept`].

mod color;
mod commands;
mod exit_error;
mod intercept;
mod logging;
mod record_intercept;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "clr", version, about = "Black-box CLI interception and replay", styles = color::styles())]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up an intercept session and print shell code to eval.
    Run(commands::run::RunArgs),
    /// Run a command with the full intercept/supervise/cleanup lifecycle.
    Exec(commands::exec::ExecArgs),
    /// Report on a session's final state.
    Verify(commands::verify::VerifyArgs),
    /// Remove intercept/state directories.
    Clean(commands::clean::CleanArgs),
    /// Load and validate scenario files without running anything.
    Validate(commands::validate::ValidateArgs),
    /// Record a real command's invocations into a new scenario.
    Record(commands::record::RecordArgs),
    /// Reset a session's state.
    Init(commands::init::InitArgs),
    /// Generate a shell completion script.
    #[command(hide = true)]
    Completions(commands::completions::CompletionsArgs),
}

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let Some(argv0) = argv.first() else {
        std::process::exit(1);
    };

    if let Some(command) = intercept::should_intercept(argv0) {
        logging::init();
        let code = if std::env::var_os(record_intercept::RECORD_LOG_VAR).is_some() {
            record_intercept::run(&command, &argv[1..])
        } else {
            intercept::run(&command, &argv[1..])
        };
        std::process::exit(code);
    }

    logging::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Exec(args) => commands::exec::execute(args),
        Commands::Verify(args) => commands::verify::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Record(args) => commands::record::execute(args),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    };
    std::process::exit(exit_error::resolve(result));
}
