//! # coinduel-engine: Coinflip Match Engine
//!
//! Resolves head-to-head coinflip duels between two participants. Each match
//! is a sequence of independent coin flips with win-streak tracking and an
//! anti-streak weighting that makes long runs less likely. Randomness comes
//! from a pluggable source so live matches use the OS CSPRNG while tests and
//! replays run from seeds or recorded draws.
//!
//! ## Core Modules
//!
//! - [`side`] - Coin faces (Side) and the two seats (Seat)
//! - [`rules`] - Victory conditions and match configuration
//! - [`engine`] - Side choices, round resolution and per-round snapshots
//! - [`coin`] - Randomness sources (OS, seeded ChaCha20, scripted, recording)
//! - [`logger`] - MatchRecord serialization for JSONL match logs
//! - [`errors`] - Error types for match operations
//!
//! ## Quick Start
//!
//! ```rust
//! use coinduel_engine::coin::SeededCoin;
//! use coinduel_engine::engine::Match;
//! use coinduel_engine::rules::{MatchConfig, VictoryCondition};
//! use coinduel_engine::side::Side;
//!
//! let config = MatchConfig::configure("ann", "bob", VictoryCondition::BestOf(5)).unwrap();
//! let mut game = Match::new(config);
//! game.record_choice(&"ann", Side::Heads).unwrap();
//! game.record_choice(&"bob", Side::Tails).unwrap();
//!
//! for snapshot in game.run(SeededCoin::new_with_seed(7)).unwrap() {
//!     let snapshot = snapshot.unwrap();
//!     let s = &snapshot.state;
//!     assert_eq!(s.score_a() + s.score_b(), s.rounds_played());
//!     if let Some(result) = &snapshot.result {
//!         println!("{:?} after {} rounds", result, s.rounds_played());
//!     }
//! }
//! ```
//!
//! ## Deterministic Replay
//!
//! Recording the draws of one match and feeding them back reproduces it:
//!
//! ```rust
//! use coinduel_engine::coin::{OsCoin, RecordingCoin, ScriptedCoin};
//! use coinduel_engine::engine::Match;
//! use coinduel_engine::rules::{MatchConfig, VictoryCondition};
//! use coinduel_engine::side::Side;
//!
//! let setup = || {
//!     let cfg = MatchConfig::configure(1u64, 2u64, VictoryCondition::FirstTo(4)).unwrap();
//!     let mut game = Match::new(cfg);
//!     game.record_choice(&1, Side::Tails).unwrap();
//!     game.record_choice(&2, Side::Heads).unwrap();
//!     game
//! };
//!
//! let (live, coin) = setup().run(RecordingCoin::new(OsCoin)).unwrap().play_out_with_coin().unwrap();
//! let replayed = setup().run(ScriptedCoin::new(coin.into_draws())).unwrap().play_out().unwrap();
//! assert_eq!(live, replayed);
//! ```

pub mod coin;
pub mod engine;
pub mod errors;
pub mod logger;
pub mod rules;
pub mod side;
