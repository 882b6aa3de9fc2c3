//! Text rendering of duel progress for the terminal.
//!
//! Pure functions: every line a duel prints is built here so commands only
//! decide *when* to write.
//!
//! ```rust
//! use coinduel_cli::formatters::format_round;
//! use coinduel_engine::engine::RoundResult;
//! use coinduel_engine::side::{Seat, Side};
//!
//! let r = RoundResult { round: 3, outcome: Side::Heads, winner: Seat::A, forced: false };
//! assert_eq!(format_round(&r, ["alice", "bob"]), "Round 3: HEADS - alice wins");
//! ```

use coinduel_engine::engine::{MatchSnapshot, MatchState, RoundResult, Verdict};
use coinduel_engine::rules::VictoryCondition;
use coinduel_engine::side::{Seat, Side};

/// Results listed in full by the final block; longer matches show the tail.
pub const FINAL_RESULTS_SHOWN: usize = 10;

pub fn format_round(round: &RoundResult, names: [&str; 2]) -> String {
    format!(
        "Round {}: {} - {} wins",
        round.round,
        round.outcome,
        names[round.winner.index()]
    )
}

/// One-letter side marker used in the recent-results strip.
pub fn side_letter(side: Side) -> char {
    match side {
        Side::Heads => 'H',
        Side::Tails => 'T',
    }
}

/// Running score, e.g. `alice (HEADS): 2 | bob (TAILS): 1 | Rounds Played: 3/5`.
///
/// Best-of matches show the round limit; first-to matches have none.
pub fn format_score(
    state: &MatchState,
    names: [&str; 2],
    sides: [Side; 2],
    victory: VictoryCondition,
) -> String {
    let played = match victory {
        VictoryCondition::BestOf(n) => format!("{}/{}", state.rounds_played(), n),
        VictoryCondition::FirstTo(_) => state.rounds_played().to_string(),
    };
    format!(
        "{} ({}): {} | {} ({}): {} | Rounds Played: {}",
        names[0],
        sides[0],
        state.score(Seat::A),
        names[1],
        sides[1],
        state.score(Seat::B),
        played
    )
}

/// `Recent: H T T` over the last `n` rounds.
pub fn format_recent<P>(snapshot: &MatchSnapshot<P>, n: usize) -> String {
    let strip: Vec<String> = snapshot
        .recent(n)
        .iter()
        .map(|r| side_letter(r.outcome).to_string())
        .collect();
    format!("Recent: {}", strip.join(" "))
}

pub fn format_matchup(names: [&str; 2], sides: [Side; 2], victory: VictoryCondition) -> String {
    format!(
        "{} ({}) vs {} ({}) - {}",
        names[0], sides[0], names[1], sides[1], victory
    )
}

/// Closing summary of a concluded match.
pub fn format_final_block(
    last: &MatchSnapshot<String>,
    names: [&str; 2],
    victory: VictoryCondition,
) -> Vec<String> {
    let state = &last.state;
    let mut lines = Vec::new();
    match &last.result {
        Some(Verdict::Win(winner)) => lines.push(format!("{} WINS!", winner)),
        Some(Verdict::Tie) => lines.push("IT'S A TIE!".to_string()),
        None => lines.push("Match unfinished".to_string()),
    }
    lines.push("Final Score:".to_string());
    lines.push(format!("  {}: {} wins", names[0], state.score_a()));
    lines.push(format!("  {}: {} wins", names[1], state.score_b()));
    lines.push(format!("Mode: {}", victory));
    lines.push(format!("Total Rounds: {}", state.rounds_played()));

    let history = state.history();
    if history.len() <= FINAL_RESULTS_SHOWN {
        lines.push("All Results:".to_string());
    } else {
        lines.push(format!("Last {} Results:", FINAL_RESULTS_SHOWN));
    }
    for r in last.recent(FINAL_RESULTS_SHOWN) {
        lines.push(format!("  {}", format_round(r, names)));
    }
    lines
}
