use crate::errors::MatchError;
use crate::side::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest round target a match may be configured with.
pub const MAX_ROUND_TARGET: u32 = 200;

/// Streak length at which the anti-streak weighting kicks in.
pub const STREAK_THRESHOLD: u32 = 3;

/// Chance, in percent, that a streak round is forced against the streak holder.
pub const STREAK_BREAK_PERCENT: u32 = 60;

/// How a match is decided.
///
/// Serialized as `{"mode": "first_to", "target": 3}`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "snake_case")]
pub enum VictoryCondition {
    /// Ends as soon as one side has `n` round wins.
    FirstTo(u32),
    /// Plays at most `n` rounds, ending early once a side holds a majority.
    BestOf(u32),
}

impl VictoryCondition {
    /// Builds a victory condition from a mode tag and round count.
    ///
    /// The range of `target` is checked later by [`MatchConfig::configure`];
    /// only the tag is validated here.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinduel_engine::rules::VictoryCondition;
    ///
    /// assert_eq!(VictoryCondition::from_tag("ft", 3), Ok(VictoryCondition::FirstTo(3)));
    /// assert_eq!(VictoryCondition::from_tag("BestOf", 5), Ok(VictoryCondition::BestOf(5)));
    /// assert!(VictoryCondition::from_tag("race", 5).is_err());
    /// ```
    pub fn from_tag(tag: &str, target: u32) -> Result<Self, MatchError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ft" | "firstto" | "first_to" => Ok(VictoryCondition::FirstTo(target)),
            "bo" | "bestof" | "best_of" => Ok(VictoryCondition::BestOf(target)),
            other => Err(MatchError::InvalidConfiguration(format!(
                "unrecognized mode '{}', expected ft or bo",
                other
            ))),
        }
    }

    pub fn target(self) -> u32 {
        match self {
            VictoryCondition::FirstTo(n) | VictoryCondition::BestOf(n) => n,
        }
    }

    /// Wins needed to end the match before the round limit.
    pub fn wins_needed(self) -> u32 {
        match self {
            VictoryCondition::FirstTo(n) => n,
            VictoryCondition::BestOf(n) => n / 2 + 1,
        }
    }

    /// Upper bound on rounds this condition can take.
    pub fn max_rounds(self) -> u32 {
        match self {
            VictoryCondition::FirstTo(n) => (2 * n).saturating_sub(1),
            VictoryCondition::BestOf(n) => n,
        }
    }

    /// Decides whether the match is over, given the scores so far.
    ///
    /// Returns `Some(Some(seat))` for a winner, `Some(None)` for a tie and
    /// `None` while the match continues.
    pub fn decide(self, score_a: u32, score_b: u32, rounds_played: u32) -> Option<Option<Seat>> {
        let needed = self.wins_needed();
        if score_a >= needed {
            return Some(Some(Seat::A));
        }
        if score_b >= needed {
            return Some(Some(Seat::B));
        }
        match self {
            VictoryCondition::FirstTo(_) => None,
            VictoryCondition::BestOf(n) if rounds_played >= n => Some(match score_a.cmp(&score_b) {
                std::cmp::Ordering::Greater => Some(Seat::A),
                std::cmp::Ordering::Less => Some(Seat::B),
                std::cmp::Ordering::Equal => None,
            }),
            VictoryCondition::BestOf(_) => None,
        }
    }
}

impl fmt::Display for VictoryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VictoryCondition::FirstTo(n) => write!(f, "First to {}", n),
            VictoryCondition::BestOf(n) => write!(f, "Best of {}", n),
        }
    }
}

/// Immutable description of a match: who plays and how it is won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig<P> {
    participant_a: P,
    participant_b: P,
    victory: VictoryCondition,
}

impl<P: PartialEq> MatchConfig<P> {
    /// Validates and freezes a match configuration.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidConfiguration`] when both participants are the
    /// same or the round target lies outside `1..=200`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinduel_engine::errors::MatchError;
    /// use coinduel_engine::rules::{MatchConfig, VictoryCondition};
    ///
    /// let cfg = MatchConfig::configure("ann", "bob", VictoryCondition::FirstTo(3)).unwrap();
    /// assert_eq!(cfg.victory(), VictoryCondition::FirstTo(3));
    ///
    /// let same = MatchConfig::configure("ann", "ann", VictoryCondition::BestOf(1));
    /// assert!(matches!(same, Err(MatchError::InvalidConfiguration(_))));
    /// ```
    pub fn configure(
        participant_a: P,
        participant_b: P,
        victory: VictoryCondition,
    ) -> Result<Self, MatchError> {
        if participant_a == participant_b {
            return Err(MatchError::InvalidConfiguration(
                "a participant cannot play against themselves".into(),
            ));
        }
        let target = victory.target();
        if !(1..=MAX_ROUND_TARGET).contains(&target) {
            return Err(MatchError::InvalidConfiguration(format!(
                "round count {} outside 1..={}",
                target, MAX_ROUND_TARGET
            )));
        }
        Ok(Self {
            participant_a,
            participant_b,
            victory,
        })
    }

    pub fn seat_of(&self, participant: &P) -> Result<Seat, MatchError> {
        if *participant == self.participant_a {
            Ok(Seat::A)
        } else if *participant == self.participant_b {
            Ok(Seat::B)
        } else {
            Err(MatchError::UnknownParticipant)
        }
    }
}

impl<P> MatchConfig<P> {
    pub fn participant(&self, seat: Seat) -> &P {
        match seat {
            Seat::A => &self.participant_a,
            Seat::B => &self.participant_b,
        }
    }

    pub fn participant_a(&self) -> &P {
        &self.participant_a
    }

    pub fn participant_b(&self) -> &P {
        &self.participant_b
    }

    pub fn victory(&self) -> VictoryCondition {
        self.victory
    }
}
