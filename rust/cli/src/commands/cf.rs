//! Coinflip duel command.
//!
//! Parses `cf <user1> vs <user2> [mode] [rounds]`, collects both side
//! choices (flags or prompts), then drives the match engine one snapshot at
//! a time with a pacing delay between rounds.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use coinduel_engine::coin::{CoinSource, OsCoin, RecordingCoin, SeededCoin};
use coinduel_engine::engine::{Match, MatchSnapshot};
use coinduel_engine::logger::{MatchLogger, MatchRecord};
use coinduel_engine::rules::MatchConfig;
use coinduel_engine::side::Side;
use tracing::info;

use crate::cli::CfArgs;
use crate::config::{self, MAX_PACE_MS};
use crate::error::CliError;
use crate::formatters::{format_final_block, format_matchup, format_recent, format_round, format_score};
use crate::io_utils::{ensure_parent_dir, read_stdin_line};
use crate::ui;
use crate::validation::{DuelRequest, Participant, SideInput, parse_duel, parse_side_choice};

pub fn handle_cf_command(
    args: CfArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let request = parse_duel(
        &args.user1,
        &args.vs,
        &args.user2,
        args.mode.as_deref(),
        args.rounds.as_deref(),
    )
    .map_err(CliError::InvalidInput)?;

    let cfg = config::load().map_err(|e| CliError::Config(e.to_string()))?;
    let pace_ms = args.pace_ms.unwrap_or(cfg.pace_ms);
    if pace_ms > MAX_PACE_MS {
        return Err(CliError::InvalidInput(format!(
            "--pace-ms must be <= {}",
            MAX_PACE_MS
        )));
    }
    let seed = args.seed.or(cfg.seed);

    let DuelRequest {
        first,
        second,
        victory,
    } = request;
    let mut game = Match::new(MatchConfig::configure(
        first.key.clone(),
        second.key.clone(),
        victory,
    )?);

    // Prompts would corrupt a JSON stream on stdout.
    let side_a = choose_side(&first, args.side_a.as_deref(), args.json, out, err, stdin)?;
    game.record_choice(&first.key, side_a)?;
    let side_b = choose_side(&second, args.side_b.as_deref(), args.json, out, err, stdin)?;
    game.record_choice(&second.key, side_b)?;

    if side_a == side_b {
        ui::display_warning(
            err,
            &format!(
                "Both players chose {}: {} takes rounds that land {}, {} takes the rest",
                side_a, first.display, side_a, second.display
            ),
        )?;
    }

    let names = [first.display.as_str(), second.display.as_str()];
    let sides = [side_a, side_b];
    if !args.json {
        writeln!(out, "{}", format_matchup(names, sides, victory))?;
    }

    let coin: Box<dyn CoinSource> = match seed {
        Some(s) => Box::new(SeededCoin::new_with_seed(s)),
        None => Box::new(OsCoin),
    };
    let mut rounds = game.run(RecordingCoin::new(coin))?;

    let mut last: Option<MatchSnapshot<String>> = None;
    for step in rounds.by_ref() {
        let snapshot = with_display_names(step?, &first, &second);
        if args.json {
            let line = serde_json::to_string(&snapshot).map_err(std::io::Error::other)?;
            writeln!(out, "{}", line)?;
        } else if let Some(round) = snapshot.latest() {
            writeln!(out, "{}", format_round(round, names))?;
            writeln!(out, "{}", format_score(&snapshot.state, names, sides, victory))?;
            writeln!(out, "{}", format_recent(&snapshot, cfg.recent_rounds))?;
        }
        out.flush()?;
        if !snapshot.is_concluded() && pace_ms > 0 {
            std::thread::sleep(Duration::from_millis(pace_ms));
        }
        last = Some(snapshot);
    }
    let last = last.ok_or_else(|| CliError::InvalidInput("match produced no rounds".into()))?;

    if !args.json {
        writeln!(out)?;
        for line in format_final_block(&last, names, victory) {
            writeln!(out, "{}", line)?;
        }
    }
    info!(
        a = %first.display,
        b = %second.display,
        rounds = last.state.rounds_played(),
        "duel finished"
    );

    if let Some(path) = args.output {
        let draws = rounds.coin().draws().to_vec();
        ensure_parent_dir(Path::new(&path)).map_err(CliError::InvalidInput)?;
        let mut logger = MatchLogger::append(&path)?;
        let record = MatchRecord::from_snapshot(
            logger.next_id(),
            seed,
            (first.display.clone(), second.display.clone()),
            (side_a, side_b),
            victory,
            draws,
            &last,
        );
        logger.write(&record)?;
    }
    Ok(())
}

fn choose_side(
    who: &Participant,
    preset: Option<&str>,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Side, CliError> {
    if let Some(raw) = preset {
        return raw
            .parse::<Side>()
            .map_err(|msg| CliError::InvalidInput(format!("{}: {}", who.display, msg)));
    }
    let question = format!("{}, choose heads or tails:", who.display);
    loop {
        if json {
            ui::prompt(err, &question)?;
        } else {
            ui::prompt(out, &question)?;
        }
        let Some(line) = read_stdin_line(stdin) else {
            return Err(CliError::Interrupted(format!(
                "{} did not choose a side",
                who.display
            )));
        };
        match parse_side_choice(&line) {
            SideInput::Side(side) => return Ok(side),
            SideInput::Quit => {
                return Err(CliError::Interrupted("duel abandoned".into()));
            }
            SideInput::Invalid(msg) => ui::write_error(err, &msg)?,
        }
    }
}

/// Swap participant keys in a verdict for their display spelling.
fn with_display_names(
    snapshot: MatchSnapshot<String>,
    first: &Participant,
    second: &Participant,
) -> MatchSnapshot<String> {
    MatchSnapshot {
        state: snapshot.state,
        result: snapshot.result.map(|v| {
            v.map(|key| {
                if key == first.key {
                    first.display.clone()
                } else {
                    second.display.clone()
                }
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Cursor;

    fn args(extra: &[&str]) -> CfArgs {
        use clap::Parser;
        let mut argv = vec!["coinduel", "cf"];
        argv.extend_from_slice(extra);
        match crate::cli::CoinduelCli::try_parse_from(argv).unwrap().cmd {
            crate::cli::Commands::Cf(a) => a,
            other => panic!("expected cf, got {:?}", other),
        }
    }

    fn run_cf(extra: &[&str], input: &str) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let res = handle_cf_command(args(extra), &mut out, &mut err, &mut stdin);
        (
            res,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    #[serial]
    fn test_prompts_until_valid_side() {
        let (res, out, err) = run_cf(
            &["ann", "vs", "bob", "--seed", "5", "--pace-ms", "0"],
            "edge\nh\nt\n",
        );
        assert!(res.is_ok(), "{:?}", res);
        assert_eq!(out.matches("ann, choose heads or tails:").count(), 2);
        assert!(out.contains("bob, choose heads or tails:"));
        assert!(err.contains("Unrecognized side 'edge'"));
        assert!(out.contains("Round 1:"));
        assert!(out.contains("Mode: Best of 1"));
    }

    #[test]
    #[serial]
    fn test_quit_abandons_duel() {
        let (res, _, _) = run_cf(&["ann", "vs", "bob", "--pace-ms", "0"], "q\n");
        assert!(matches!(res, Err(CliError::Interrupted(_))));
    }

    #[test]
    #[serial]
    fn test_eof_abandons_duel() {
        let (res, _, _) = run_cf(&["ann", "vs", "bob", "--side-a", "h", "--pace-ms", "0"], "");
        assert!(matches!(res, Err(CliError::Interrupted(_))));
    }

    #[test]
    #[serial]
    fn test_same_side_warns() {
        let (res, _, err) = run_cf(
            &[
                "ann", "vs", "bob", "--side-a", "heads", "--side-b", "HEADS", "--seed", "1",
                "--pace-ms", "0",
            ],
            "",
        );
        assert!(res.is_ok());
        assert!(err.contains("WARNING: Both players chose HEADS"));
    }

    #[test]
    #[serial]
    fn test_json_lines_end_with_result() {
        let (res, out, _) = run_cf(
            &[
                "ann", "vs", "bob", "ft", "3", "--side-a", "h", "--side-b", "t", "--seed", "11",
                "--pace-ms", "0", "--json",
            ],
            "",
        );
        assert!(res.is_ok());
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert!(lines.len() >= 3);
        let (last, rest) = lines.split_last().unwrap();
        assert!(rest.iter().all(|v| v["result"].is_null()));
        let winner = last["result"]["win"].as_str().unwrap();
        assert!(winner == "ann" || winner == "bob");
    }
}
