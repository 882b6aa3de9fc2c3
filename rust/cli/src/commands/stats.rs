//! Statistics aggregation over match record files.
//!
//! Reads one file or a directory tree of `.jsonl` / `.jsonl.zst` match logs
//! and prints a pretty JSON summary: matches, ties, wins per participant,
//! round totals, anti-streak interventions and face counts.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use coinduel_engine::engine::Verdict;
use coinduel_engine::logger::MatchRecord;
use coinduel_engine::rules::VictoryCondition;
use coinduel_engine::side::Side;

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui;

#[derive(Default)]
struct StatsState {
    matches: u64,
    ties: u64,
    unfinished: u64,
    wins: BTreeMap<String, u64>,
    first_to: u64,
    best_of: u64,
    rounds: u64,
    forced_rounds: u64,
    heads: u64,
    tails: u64,
    longest_streak: u32,
    skipped: u64,
    corrupted: u64,
}

impl StatsState {
    fn add(&mut self, rec: &MatchRecord) {
        self.matches += 1;
        match &rec.result {
            Some(Verdict::Win(name)) => *self.wins.entry(name.clone()).or_default() += 1,
            Some(Verdict::Tie) => self.ties += 1,
            None => self.unfinished += 1,
        }
        match rec.victory {
            VictoryCondition::FirstTo(_) => self.first_to += 1,
            VictoryCondition::BestOf(_) => self.best_of += 1,
        }
        for r in &rec.rounds {
            self.rounds += 1;
            if r.forced {
                self.forced_rounds += 1;
            }
            match r.outcome {
                Side::Heads => self.heads += 1,
                Side::Tails => self.tails += 1,
            }
        }
        self.longest_streak = self.longest_streak.max(rec.longest_streak());
    }

    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str::<MatchRecord>(line) {
                Ok(rec) => self.add(&rec),
                Err(_) if i == lines.len() - 1 && !has_trailing_nl => self.skipped += 1,
                Err(_) => self.corrupted += 1,
            }
        }
    }
}

pub fn handle_stats_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState::default();

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let rd = match std::fs::read_dir(&d) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if let Some(fname) = p.file_name().and_then(|f| f.to_str())
                    && (fname.ends_with(".jsonl") || fname.ends_with(".jsonl.zst"))
                {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => state.consume(&content),
                        Err(_) => state.corrupted += 1,
                    }
                }
            }
        }
    } else {
        let content = read_text_auto(&input)
            .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;
        state.consume(&content);
    }

    if state.corrupted > 0 {
        ui::display_warning(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.skipped > 0 {
        ui::display_warning(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if !path.is_dir() && state.matches == 0 && (state.corrupted > 0 || state.skipped > 0) {
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "matches": state.matches,
        "ties": state.ties,
        "unfinished": state.unfinished,
        "wins": state.wins,
        "modes": { "first_to": state.first_to, "best_of": state.best_of },
        "rounds": state.rounds,
        "forced_rounds": state.forced_rounds,
        "outcomes": { "heads": state.heads, "tails": state.tails },
        "longest_streak": state.longest_streak,
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}
