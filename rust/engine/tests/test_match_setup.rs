use coinduel_engine::coin::ScriptedCoin;
use coinduel_engine::engine::Match;
use coinduel_engine::errors::MatchError;
use coinduel_engine::rules::{MatchConfig, VictoryCondition, MAX_ROUND_TARGET};
use coinduel_engine::side::{Seat, Side};

#[test]
fn same_participant_twice_is_invalid() {
    let err = MatchConfig::configure("ann", "ann", VictoryCondition::FirstTo(3)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfiguration(_)));
}

#[test]
fn round_count_above_cap_is_invalid() {
    let err = MatchConfig::configure("ann", "bob", VictoryCondition::FirstTo(250)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfiguration(_)));
    let err = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(250)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfiguration(_)));
}

#[test]
fn zero_rounds_is_invalid() {
    let err = MatchConfig::configure(1, 2, VictoryCondition::BestOf(0)).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfiguration(_)));
}

#[test]
fn cap_itself_is_accepted() {
    assert!(MatchConfig::configure(1, 2, VictoryCondition::BestOf(MAX_ROUND_TARGET)).is_ok());
}

#[test]
fn unknown_mode_tag_is_invalid() {
    let err = VictoryCondition::from_tag("sudden-death", 3).unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfiguration(_)));
    assert_eq!(
        VictoryCondition::from_tag("FirstTo", 3),
        Ok(VictoryCondition::FirstTo(3))
    );
    assert_eq!(
        VictoryCondition::from_tag("bo", 7),
        Ok(VictoryCondition::BestOf(7))
    );
}

#[test]
fn stranger_cannot_choose() {
    let cfg = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(3)).unwrap();
    let mut game = Match::new(cfg);
    assert_eq!(
        game.record_choice(&"eve", Side::Heads),
        Err(MatchError::UnknownParticipant)
    );
    assert_eq!(game.choice(Seat::A), None);
    assert_eq!(game.choice(Seat::B), None);
}

#[test]
fn second_choice_by_same_participant_is_rejected() {
    let cfg = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(3)).unwrap();
    let mut game = Match::new(cfg);
    assert_eq!(game.record_choice(&"bob", Side::Tails), Ok(Seat::B));
    assert_eq!(
        game.record_choice(&"bob", Side::Heads),
        Err(MatchError::ChoiceAlreadyMade)
    );
    assert_eq!(game.choice(Seat::B), Some(Side::Tails));
}

#[test]
fn run_requires_both_choices() {
    let cfg = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(3)).unwrap();
    let mut game = Match::new(cfg);
    game.record_choice(&"ann", Side::Heads).unwrap();
    assert!(!game.choices_complete());
    let err = game.run(ScriptedCoin::new([0, 0])).unwrap_err();
    assert_eq!(err, MatchError::ChoicesIncomplete);
}

#[test]
fn both_may_pick_the_same_side() {
    let cfg = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(1)).unwrap();
    let mut game = Match::new(cfg);
    game.record_choice(&"ann", Side::Heads).unwrap();
    game.record_choice(&"bob", Side::Heads).unwrap();
    assert!(game.choices_complete());
    assert!(game.run(ScriptedCoin::new([0])).is_ok());
}
