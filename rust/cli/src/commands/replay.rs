//! Replay command handler.
//!
//! Re-runs every match in a JSONL record file (plain or `.zst`) from its
//! recorded draws and checks that the engine reproduces the stored rounds,
//! scores and result. A record whose draws do not reproduce it, or that
//! leaves draws unconsumed, is reported as a mismatch.

use std::io::Write;

use coinduel_engine::coin::ScriptedCoin;
use coinduel_engine::engine::{Match, MatchSnapshot, Verdict};
use coinduel_engine::errors::MatchError;
use coinduel_engine::logger::MatchRecord;
use coinduel_engine::rules::MatchConfig;
use tracing::warn;

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::parse_json_or_continue;

pub fn handle_replay_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text_auto(&input)
        .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;

    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        writeln!(out, "No matches found in file.")?;
        return Ok(());
    }

    let mut verified = 0usize;
    let mut failed = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let record: MatchRecord =
            parse_json_or_continue!(line, err, format!("match {}", i + 1), failed);
        match replay(&record) {
            Ok(()) => {
                verified += 1;
                writeln!(
                    out,
                    "Match {}: OK ({} rounds, {})",
                    record.match_id,
                    record.rounds.len(),
                    describe(&record.result)
                )?;
            }
            Err(reason) => {
                failed += 1;
                warn!(match_id = %record.match_id, %reason, "replay mismatch");
                writeln!(out, "Match {}: MISMATCH ({})", record.match_id, reason)?;
            }
        }
    }

    writeln!(
        out,
        "Replayed {} match(es): {} verified, {} failed",
        lines.len(),
        verified,
        failed
    )?;
    if failed > 0 {
        return Err(CliError::InvalidInput(
            "Replay verification failed".to_string(),
        ));
    }
    Ok(())
}

fn describe(result: &Option<Verdict<String>>) -> String {
    match result {
        Some(Verdict::Win(name)) => format!("{} wins", name),
        Some(Verdict::Tie) => "tie".to_string(),
        None => "unfinished".to_string(),
    }
}

fn replay(record: &MatchRecord) -> Result<(), String> {
    let engine_err = |e: MatchError| e.to_string();
    let cfg = MatchConfig::configure(
        record.participant_a.clone(),
        record.participant_b.clone(),
        record.victory,
    )
    .map_err(engine_err)?;
    let mut game = Match::new(cfg);
    game.record_choice(&record.participant_a, record.side_a)
        .map_err(engine_err)?;
    game.record_choice(&record.participant_b, record.side_b)
        .map_err(engine_err)?;

    let (last, coin): (MatchSnapshot<String>, ScriptedCoin) = game
        .run(ScriptedCoin::new(record.draws.iter().copied()))
        .map_err(engine_err)?
        .play_out_with_coin()
        .map_err(engine_err)?;

    if last.state.history() != record.rounds.as_slice() {
        return Err("round history differs".to_string());
    }
    if (last.state.score_a(), last.state.score_b()) != (record.score_a, record.score_b) {
        return Err("scores differ".to_string());
    }
    if last.result != record.result {
        return Err("result differs".to_string());
    }
    if coin.remaining() > 0 {
        return Err(format!("{} unused draw(s)", coin.remaining()));
    }
    Ok(())
}
