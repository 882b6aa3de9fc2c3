//! Command handler modules for the coinduel CLI.
//!
//! Each command lives in its own file with the same shape:
//!
//! - Public handler: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin are passed in, never grabbed
//! - Errors propagate as [`CliError`]; [`crate::run`] prints them and picks
//!   the exit code
//!
//! Duel commands: flip, cf, replay, stats. Desk commands (settings, ticket,
//! mmstats, leaderboard) share [`open_store`].

mod cf;
mod cfg;
mod desk;
mod flip;
mod replay;
mod settings;
mod stats;
mod ticket;

pub use cf::handle_cf_command;
pub use cfg::handle_cfg_command;
pub use desk::{handle_leaderboard_command, handle_mmstats_command};
pub use flip::handle_flip_command;
pub use replay::handle_replay_command;
pub use settings::handle_settings_command;
pub use stats::handle_stats_command;
pub use ticket::handle_ticket_command;

use std::path::Path;

use tracing::debug;

use crate::config;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::store::DeskStore;

/// Open the desk database named by `--db`, falling back to the configured path.
pub fn open_store(db: Option<String>) -> Result<DeskStore, CliError> {
    let path = match db {
        Some(p) => p,
        None => {
            config::load()
                .map_err(|e| CliError::Config(e.to_string()))?
                .database
        }
    };
    ensure_parent_dir(Path::new(&path)).map_err(CliError::InvalidInput)?;
    debug!(%path, "opening desk store");
    Ok(DeskStore::open(&path)?)
}
