use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use tracing::{debug, info, warn};

use crate::coin::CoinSource;
use crate::errors::MatchError;
use crate::rules::{MatchConfig, STREAK_BREAK_PERCENT, STREAK_THRESHOLD};
use crate::side::{Seat, Side};

/// Outcome of one resolved round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round index
    pub round: u32,
    /// Face the coin landed on
    pub outcome: Side,
    /// Seat credited with the round
    pub winner: Seat,
    /// True when the anti-streak weighting decided the flip
    #[serde(default)]
    pub forced: bool,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Round {}: {} - {:?} wins",
            self.round, self.outcome, self.winner
        )
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict<P> {
    Win(P),
    Tie,
}

impl<P> Verdict<P> {
    pub fn winner(&self) -> Option<&P> {
        match self {
            Verdict::Win(p) => Some(p),
            Verdict::Tie => None,
        }
    }

    pub fn map<Q, F: FnOnce(P) -> Q>(self, f: F) -> Verdict<Q> {
        match self {
            Verdict::Win(p) => Verdict::Win(f(p)),
            Verdict::Tie => Verdict::Tie,
        }
    }
}

/// Running scores and round history of a match.
///
/// Only the engine mutates it; callers see copies through [`MatchSnapshot`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    score_a: u32,
    score_b: u32,
    rounds_played: u32,
    history: Vec<RoundResult>,
    last_winner: Option<Seat>,
    /// 0 until the first round, then always >= 1
    streak_length: u32,
}

impl MatchState {
    pub fn score(&self, seat: Seat) -> u32 {
        match seat {
            Seat::A => self.score_a,
            Seat::B => self.score_b,
        }
    }

    pub fn score_a(&self) -> u32 {
        self.score_a
    }

    pub fn score_b(&self) -> u32 {
        self.score_b
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn last_winner(&self) -> Option<Seat> {
        self.last_winner
    }

    pub fn streak_length(&self) -> u32 {
        self.streak_length
    }

    fn apply(&mut self, outcome: Side, winner: Seat, forced: bool) {
        self.rounds_played += 1;
        self.history.push(RoundResult {
            round: self.rounds_played,
            outcome,
            winner,
            forced,
        });
        match winner {
            Seat::A => self.score_a += 1,
            Seat::B => self.score_b += 1,
        }
        if self.last_winner == Some(winner) {
            self.streak_length += 1;
        } else {
            self.last_winner = Some(winner);
            self.streak_length = 1;
        }
    }
}

/// Immutable view of a match after one resolved round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot<P> {
    pub state: MatchState,
    /// Present only on the final snapshot
    pub result: Option<Verdict<P>>,
}

impl<P> MatchSnapshot<P> {
    pub fn is_concluded(&self) -> bool {
        self.result.is_some()
    }

    /// The last `n` rounds, oldest first.
    pub fn recent(&self, n: usize) -> &[RoundResult] {
        let history = self.state.history();
        &history[history.len().saturating_sub(n)..]
    }

    pub fn latest(&self) -> Option<&RoundResult> {
        self.state.history().last()
    }
}

/// A configured match collecting side choices before it can run.
///
/// # Examples
///
/// ```
/// use coinduel_engine::coin::ScriptedCoin;
/// use coinduel_engine::engine::{Match, Verdict};
/// use coinduel_engine::rules::{MatchConfig, VictoryCondition};
/// use coinduel_engine::side::Side;
///
/// let config = MatchConfig::configure("ann", "bob", VictoryCondition::FirstTo(3)).unwrap();
/// let mut game = Match::new(config);
/// game.record_choice(&"ann", Side::Heads).unwrap();
/// game.record_choice(&"bob", Side::Tails).unwrap();
///
/// let coin = ScriptedCoin::from_sides(&[Side::Heads, Side::Heads, Side::Heads]);
/// let last = game.run(coin).unwrap().play_out().unwrap();
/// assert_eq!(last.result, Some(Verdict::Win("ann")));
/// assert_eq!(last.state.rounds_played(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Match<P> {
    config: MatchConfig<P>,
    choices: [Option<Side>; 2],
}

impl<P: PartialEq + Clone> Match<P> {
    pub fn new(config: MatchConfig<P>) -> Self {
        Self {
            config,
            choices: [None, None],
        }
    }

    pub fn config(&self) -> &MatchConfig<P> {
        &self.config
    }

    pub fn choice(&self, seat: Seat) -> Option<Side> {
        self.choices[seat.index()]
    }

    /// Records a participant's side.
    ///
    /// # Errors
    ///
    /// - [`MatchError::UnknownParticipant`] if `participant` is not configured
    /// - [`MatchError::ChoiceAlreadyMade`] if that participant already chose
    pub fn record_choice(&mut self, participant: &P, side: Side) -> Result<Seat, MatchError> {
        let seat = self.config.seat_of(participant)?;
        let slot = &mut self.choices[seat.index()];
        if slot.is_some() {
            return Err(MatchError::ChoiceAlreadyMade);
        }
        *slot = Some(side);
        Ok(seat)
    }

    pub fn choices_complete(&self) -> bool {
        self.choices.iter().all(Option::is_some)
    }

    /// Starts the match, consuming it.
    ///
    /// # Errors
    ///
    /// [`MatchError::ChoicesIncomplete`] unless both sides are recorded.
    pub fn run<C: CoinSource>(self, coin: C) -> Result<Rounds<P, C>, MatchError> {
        let (Some(side_a), Some(side_b)) = (self.choices[0], self.choices[1]) else {
            return Err(MatchError::ChoicesIncomplete);
        };
        info!(
            victory = %self.config.victory(),
            side_a = %side_a,
            side_b = %side_b,
            "match started"
        );
        Ok(Rounds {
            config: self.config,
            sides: [side_a, side_b],
            coin,
            state: MatchState::default(),
            finished: false,
        })
    }
}

/// Lazy, single-pass sequence of per-round snapshots.
///
/// Dropping it mid-match is safe. After a randomness failure it yields that
/// error once and then ends without a verdict.
#[derive(Debug)]
pub struct Rounds<P, C> {
    config: MatchConfig<P>,
    sides: [Side; 2],
    coin: C,
    state: MatchState,
    finished: bool,
}

impl<P: Clone, C: CoinSource> Rounds<P, C> {
    pub fn config(&self) -> &MatchConfig<P> {
        &self.config
    }

    pub fn side(&self, seat: Seat) -> Side {
        self.sides[seat.index()]
    }

    pub fn coin(&self) -> &C {
        &self.coin
    }

    /// Consumes the remaining rounds and returns the final snapshot.
    pub fn play_out(mut self) -> Result<MatchSnapshot<P>, MatchError> {
        let mut last = None;
        for snapshot in &mut self {
            last = Some(snapshot?);
        }
        Ok(last.unwrap_or_else(|| self.current()))
    }

    /// Like [`Rounds::play_out`], also handing back the coin.
    pub fn play_out_with_coin(mut self) -> Result<(MatchSnapshot<P>, C), MatchError> {
        let mut last = None;
        for snapshot in &mut self {
            last = Some(snapshot?);
        }
        let last = last.unwrap_or_else(|| self.current());
        Ok((last, self.coin))
    }

    /// Snapshot of the state as it stands, without advancing.
    pub fn current(&self) -> MatchSnapshot<P> {
        MatchSnapshot {
            state: self.state.clone(),
            result: self.verdict(),
        }
    }

    /// The face that credits `seat` with the round.
    fn outcome_crediting(&self, seat: Seat) -> Side {
        let side_a = self.sides[0];
        match seat {
            Seat::A => side_a,
            Seat::B if self.sides[1] != side_a => self.sides[1],
            Seat::B => side_a.opposite(),
        }
    }

    fn winner_of(&self, outcome: Side) -> Seat {
        // on shared sides a matching face goes to A
        if outcome == self.sides[0] {
            Seat::A
        } else {
            Seat::B
        }
    }

    fn draw_outcome(&mut self) -> Result<(Side, bool), MatchError> {
        match self.state.last_winner {
            Some(leader) if self.state.streak_length >= STREAK_THRESHOLD => {
                let roll = self.coin.draw_below(100)?;
                let credited = if roll < STREAK_BREAK_PERCENT {
                    leader.other()
                } else {
                    leader
                };
                Ok((self.outcome_crediting(credited), true))
            }
            _ => {
                let bit = self.coin.draw_below(2)?;
                Ok((Side::from_bit(bit), false))
            }
        }
    }

    fn verdict(&self) -> Option<Verdict<P>> {
        let decision = self.config.victory().decide(
            self.state.score_a,
            self.state.score_b,
            self.state.rounds_played,
        )?;
        Some(match decision {
            Some(seat) => Verdict::Win(self.config.participant(seat).clone()),
            None => Verdict::Tie,
        })
    }
}

impl<P: Clone, C: CoinSource> Iterator for Rounds<P, C> {
    type Item = Result<MatchSnapshot<P>, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        // draw before touching state so a failed draw commits nothing
        let (outcome, forced) = match self.draw_outcome() {
            Ok(drawn) => drawn,
            Err(e) => {
                warn!(round = self.state.rounds_played + 1, error = %e, "match aborted");
                self.finished = true;
                return Some(Err(e));
            }
        };
        let winner = self.winner_of(outcome);
        self.state.apply(outcome, winner, forced);
        debug!(
            round = self.state.rounds_played,
            outcome = %outcome,
            winner = ?winner,
            forced,
            streak = self.state.streak_length,
            "round resolved"
        );

        let result = self.verdict();
        if let Some(verdict) = &result {
            self.finished = true;
            info!(
                rounds = self.state.rounds_played,
                score_a = self.state.score_a,
                score_b = self.state.score_b,
                tie = verdict.winner().is_none(),
                "match concluded"
            );
        }
        Some(Ok(MatchSnapshot {
            state: self.state.clone(),
            result,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let victory = self.config.victory();
        let remaining = victory
            .max_rounds()
            .saturating_sub(self.state.rounds_played) as usize;
        (1, Some(remaining.max(1)))
    }
}

impl<P: Clone, C: CoinSource> FusedIterator for Rounds<P, C> {}
