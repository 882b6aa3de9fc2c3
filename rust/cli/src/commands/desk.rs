//! Responder statistics: `mmstats` and `leaderboard`.

use std::io::Write;

use crate::error::CliError;
use crate::store::DeskStore;

pub fn handle_mmstats_command(
    store: &DeskStore,
    user: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let completed = store
        .responder_stats(user)?
        .map(|s| s.tickets_completed)
        .unwrap_or(0);
    let rank = store
        .rank(user)?
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "Unranked".to_string());
    writeln!(out, "Middleman stats for {}", user)?;
    writeln!(out, "  Tickets completed: {}", completed)?;
    writeln!(out, "  Rank: {}", rank)?;
    Ok(())
}

pub fn handle_leaderboard_command(
    store: &DeskStore,
    limit: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let board = store.leaderboard(limit)?;
    if board.is_empty() {
        writeln!(out, "No completed tickets yet.")?;
        return Ok(());
    }
    writeln!(out, "Middleman Leaderboard")?;
    for (i, entry) in board.iter().enumerate() {
        writeln!(
            out,
            "{}. {} - {} ticket(s)",
            i + 1,
            entry.user_id,
            entry.tickets_completed
        )?;
    }
    Ok(())
}
