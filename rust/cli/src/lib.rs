//! # coinduel CLI Library
//!
//! Command-line front end for the coinflip match engine and the middleman
//! ticket desk.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments and dispatches to a subcommand, writing to the
//! given streams and returning the exit code.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["coinduel", "cf", "alice", "vs", "bob", "ft", "3"];
//! let code = coinduel_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `flip`: Flip a single coin
//! - `cf`: Coinflip duel between two participants
//! - `replay`: Re-run recorded matches and verify them
//! - `stats`: Aggregate match records
//! - `cfg`: Display configuration with value sources
//! - `settings`: Desk key/value settings
//! - `ticket`: Open, claim, unclaim, complete, close and show tickets
//! - `mmstats`: Completed tickets and rank of a responder
//! - `leaderboard`: Top responders

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
mod macros;
pub mod store;
pub mod ui;
pub mod validation;

use cli::{CoinduelCli, Commands};
use commands::{
    handle_cf_command, handle_cfg_command, handle_flip_command, handle_leaderboard_command,
    handle_mmstats_command, handle_replay_command, handle_settings_command, handle_stats_command,
    handle_ticket_command, open_store,
};

pub use error::CliError;

const COMMANDS: &[&str] = &[
    "flip",
    "cf",
    "replay",
    "stats",
    "cfg",
    "settings",
    "ticket",
    "mmstats",
    "leaderboard",
];

/// Main entry point for the CLI application.
///
/// Returns `0` on success, `2` on errors and `130` when a duel is abandoned
/// at a side prompt.
///
/// ```
/// use std::io;
/// let args = vec!["coinduel", "flip", "--seed", "42"];
/// let code = coinduel_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, out, err, &mut stdin_lock)
}

/// [`run`] with an explicit input stream for the interactive side prompts.
pub fn run_with_input<I, S>(
    args: I,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn std::io::BufRead,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match CoinduelCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write_or_exit!(out, "{}", e);
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Coinduel CLI");
                    write_or_exit!(err, "Usage: coinduel <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: coinduel --help");
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Flip { seed } => handle_flip_command(seed, out),
        Commands::Cf(args) => handle_cf_command(args, out, err, stdin),
        Commands::Replay { input } => handle_replay_command(input, out, err),
        Commands::Stats { input } => handle_stats_command(input, out, err),
        Commands::Cfg => handle_cfg_command(out),
        Commands::Settings { action, db } => {
            open_store(db).and_then(|store| handle_settings_command(&store, action, out))
        }
        Commands::Ticket { action, db } => {
            open_store(db).and_then(|mut store| handle_ticket_command(&mut store, action, out))
        }
        Commands::Mmstats { user, db } => {
            open_store(db).and_then(|store| handle_mmstats_command(&store, &user, out))
        }
        Commands::Leaderboard { limit, db } => open_store(db)
            .and_then(|store| handle_leaderboard_command(&store, limit as usize, out)),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Interrupted(msg)) => {
            write_or_exit!(err, "Abandoned: {}", msg);
            exit_code::INTERRUPTED
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}
