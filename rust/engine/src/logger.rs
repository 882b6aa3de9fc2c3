use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::{MatchSnapshot, RoundResult, Verdict};
use crate::rules::VictoryCondition;
use crate::side::Side;

/// Complete record of a finished match, one JSONL line per match.
///
/// `draws` holds every raw value the randomness source produced, so the match
/// can be replayed exactly with a [`crate::coin::ScriptedCoin`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (format: YYYYMMDD-HHMMSS-NNN)
    pub match_id: String,
    /// Seed when the match ran on a seeded coin
    #[serde(default)]
    pub seed: Option<u64>,
    pub participant_a: String,
    pub participant_b: String,
    pub side_a: Side,
    pub side_b: Side,
    pub victory: VictoryCondition,
    /// Raw draws in the order the engine consumed them
    pub draws: Vec<u32>,
    pub rounds: Vec<RoundResult>,
    pub score_a: u32,
    pub score_b: u32,
    /// Winner's name, or tie
    pub result: Option<Verdict<String>>,
    /// Timestamp when the match was logged (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl MatchRecord {
    /// Builds a record from the final snapshot of a match.
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        match_id: String,
        seed: Option<u64>,
        participants: (String, String),
        sides: (Side, Side),
        victory: VictoryCondition,
        draws: Vec<u32>,
        last: &MatchSnapshot<String>,
    ) -> Self {
        Self {
            match_id,
            seed,
            participant_a: participants.0,
            participant_b: participants.1,
            side_a: sides.0,
            side_b: sides.1,
            victory,
            draws,
            rounds: last.state.history().to_vec(),
            score_a: last.state.score_a(),
            score_b: last.state.score_b(),
            result: last.result.clone(),
            ts: None,
        }
    }

    /// Longest run of consecutive rounds credited to the same seat.
    pub fn longest_streak(&self) -> u32 {
        let mut best = 0;
        let mut run = 0;
        let mut prev = None;
        for r in &self.rounds {
            if prev == Some(r.winner) {
                run += 1;
            } else {
                run = 1;
                prev = Some(r.winner);
            }
            best = best.max(run);
        }
        best
    }
}

pub fn format_match_id(stamp: &str, seq: u32) -> String {
    format!("{}-{:03}", stamp, seq)
}

/// Appends [`MatchRecord`]s to a JSONL file.
pub struct MatchLogger {
    writer: Option<BufWriter<File>>,
    stamp: String,
    seq: u32,
}

impl MatchLogger {
    /// Opens `path` for appending, creating it and its parent directory.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            stamp: Utc::now().format("%Y%m%d-%H%M%S").to_string(),
            seq: 0,
        })
    }

    /// Logger that only mints ids, for tests and dry runs.
    pub fn detached(stamp: &str) -> Self {
        Self {
            writer: None,
            stamp: stamp.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.stamp, self.seq)
    }

    pub fn write(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
