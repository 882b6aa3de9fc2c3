use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Participant is not part of this match")]
    UnknownParticipant,
    #[error("Participant already chose a side")]
    ChoiceAlreadyMade,
    #[error("Both participants must choose a side before the match starts")]
    ChoicesIncomplete,
    #[error("Randomness source failed: {0}")]
    Randomness(String),
}
