use coinduel_engine::coin::{ScriptedCoin, SeededCoin};
use coinduel_engine::engine::{Match, MatchSnapshot, Verdict};
use coinduel_engine::errors::MatchError;
use coinduel_engine::rules::{MatchConfig, VictoryCondition};
use coinduel_engine::side::{Seat, Side};

fn duel(victory: VictoryCondition, a: Side, b: Side) -> Match<&'static str> {
    let cfg = MatchConfig::configure("ann", "bob", victory).expect("valid config");
    let mut game = Match::new(cfg);
    game.record_choice(&"ann", a).unwrap();
    game.record_choice(&"bob", b).unwrap();
    game
}

fn collect(game: Match<&'static str>, coin: ScriptedCoin) -> Vec<MatchSnapshot<&'static str>> {
    game.run(coin)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .expect("scripted match completes")
}

#[test]
fn first_to_three_clean_sweep() {
    let snaps = collect(
        duel(VictoryCondition::FirstTo(3), Side::Heads, Side::Tails),
        ScriptedCoin::from_sides(&[Side::Heads, Side::Heads, Side::Heads]),
    );
    assert_eq!(snaps.len(), 3);
    let last = snaps.last().unwrap();
    assert_eq!(last.result, Some(Verdict::Win("ann")));
    assert_eq!(last.state.score_a(), 3);
    assert_eq!(last.state.score_b(), 0);
    assert!(last.state.history().iter().all(|r| !r.forced));
    assert!(snaps[..2].iter().all(|s| s.result.is_none()));
}

#[test]
fn best_of_four_can_tie() {
    let snaps = collect(
        duel(VictoryCondition::BestOf(4), Side::Heads, Side::Tails),
        ScriptedCoin::from_sides(&[Side::Heads, Side::Tails, Side::Heads, Side::Tails]),
    );
    let last = snaps.last().unwrap();
    assert_eq!(last.state.rounds_played(), 4);
    assert_eq!((last.state.score_a(), last.state.score_b()), (2, 2));
    assert_eq!(last.result, Some(Verdict::Tie));
}

#[test]
fn best_of_five_stops_at_majority() {
    let snaps = collect(
        duel(VictoryCondition::BestOf(5), Side::Heads, Side::Tails),
        ScriptedCoin::from_sides(&[Side::Heads, Side::Heads, Side::Tails, Side::Heads]),
    );
    assert_eq!(snaps.len(), 4);
    let last = snaps.last().unwrap();
    assert_eq!(last.state.rounds_played(), 4);
    assert_eq!(last.result, Some(Verdict::Win("ann")));
}

#[test]
fn best_of_one_is_a_single_flip() {
    let snaps = collect(
        duel(VictoryCondition::BestOf(1), Side::Tails, Side::Heads),
        ScriptedCoin::from_sides(&[Side::Heads]),
    );
    assert_eq!(snaps.len(), 1);
    assert_eq!(snaps[0].result, Some(Verdict::Win("bob")));
}

#[test]
fn shared_side_credits_first_participant_on_match() {
    let snaps = collect(
        duel(VictoryCondition::BestOf(1), Side::Heads, Side::Heads),
        ScriptedCoin::from_sides(&[Side::Heads]),
    );
    assert_eq!(snaps[0].latest().unwrap().winner, Seat::A);
}

#[test]
fn streak_breaker_consumes_percent_draw() {
    // 3 fair heads for ann, then 59 (< 60) forces the streak to end
    let coin = ScriptedCoin::new([0, 0, 0, 59, 0, 0]);
    let snaps = collect(duel(VictoryCondition::FirstTo(5), Side::Heads, Side::Tails), coin);
    let fourth = snaps[3].latest().copied().unwrap();
    assert!(fourth.forced);
    assert_eq!(fourth.winner, Seat::B);
    assert_eq!(snaps[3].state.streak_length(), 1);
    // streak back to 1, so round five is a fair flip again
    assert!(!snaps[4].latest().unwrap().forced);
}

#[test]
fn streak_extension_keeps_weighting_active() {
    // bob wins 3 fair rounds, then rolls of 99 and 75 extend the streak
    let coin = ScriptedCoin::new([1, 1, 1, 99, 75]);
    let snaps = collect(duel(VictoryCondition::FirstTo(5), Side::Heads, Side::Tails), coin);
    let last = snaps.last().unwrap();
    assert_eq!(last.result, Some(Verdict::Win("bob")));
    assert_eq!(last.state.streak_length(), 5);
    assert_eq!(
        last.state.history().iter().filter(|r| r.forced).count(),
        2
    );
}

#[test]
fn scores_are_cumulative_per_snapshot() {
    let coin = ScriptedCoin::from_sides(&[Side::Tails, Side::Heads, Side::Tails, Side::Tails]);
    let snaps = collect(duel(VictoryCondition::FirstTo(3), Side::Heads, Side::Tails), coin);
    let scores: Vec<(u32, u32)> = snaps
        .iter()
        .map(|s| (s.state.score_a(), s.state.score_b()))
        .collect();
    assert_eq!(scores, vec![(0, 1), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn randomness_failure_aborts_without_verdict() {
    let mut rounds = duel(VictoryCondition::FirstTo(3), Side::Heads, Side::Tails)
        .run(ScriptedCoin::from_sides(&[Side::Heads]))
        .unwrap();
    let first = rounds.next().unwrap().unwrap();
    assert!(!first.is_concluded());
    assert!(matches!(rounds.next(), Some(Err(MatchError::Randomness(_)))));
    assert!(rounds.next().is_none());
}

#[test]
fn sequence_is_not_restartable() {
    let mut rounds = duel(VictoryCondition::BestOf(1), Side::Heads, Side::Tails)
        .run(ScriptedCoin::from_sides(&[Side::Heads, Side::Heads]))
        .unwrap();
    assert!(rounds.next().unwrap().unwrap().is_concluded());
    assert!(rounds.next().is_none());
    assert!(rounds.next().is_none());
}

#[test]
fn seeded_matches_are_reproducible() {
    let run = |seed| {
        duel(VictoryCondition::BestOf(51), Side::Heads, Side::Tails)
            .run(SeededCoin::new_with_seed(seed))
            .unwrap()
            .play_out()
            .unwrap()
    };
    assert_eq!(run(2024), run(2024));
}
