//! Randomness sources for coin flips.
//!
//! Every flip the engine makes goes through [`CoinSource::draw_below`], so a
//! match can run against the operating system's CSPRNG, a seeded ChaCha20
//! stream, or a scripted list of draws without the engine knowing which.

use std::collections::VecDeque;

use rand::rngs::OsRng;
use rand::{Rng, SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;

use crate::errors::MatchError;
use crate::side::Side;

/// A source of uniform integer draws.
pub trait CoinSource {
    /// Draws a uniform integer in `[0, bound)`.
    ///
    /// # Errors
    ///
    /// [`MatchError::Randomness`] when the source cannot produce a value.
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError>;
}

impl<C: CoinSource + ?Sized> CoinSource for &mut C {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        (**self).draw_below(bound)
    }
}

impl<C: CoinSource + ?Sized> CoinSource for Box<C> {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        (**self).draw_below(bound)
    }
}

fn check_bound(bound: u32) -> Result<(), MatchError> {
    if bound == 0 {
        return Err(MatchError::Randomness("cannot draw from an empty range".into()));
    }
    Ok(())
}

/// Draws from the operating system's CSPRNG.
///
/// Holds no state, so any number of concurrent matches may each use one.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCoin;

impl CoinSource for OsCoin {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        check_bound(bound)?;
        // reject the tail of the u32 range so every residue is equally likely
        let limit = u32::MAX - (u32::MAX % bound);
        loop {
            let raw = OsRng
                .try_next_u32()
                .map_err(|e| MatchError::Randomness(e.to_string()))?;
            if raw < limit {
                return Ok(raw % bound);
            }
        }
    }
}

/// Deterministic ChaCha20 stream, reproducible from its seed.
#[derive(Debug, Clone)]
pub struct SeededCoin {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededCoin {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl CoinSource for SeededCoin {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        check_bound(bound)?;
        Ok(self.rng.random_range(0..bound))
    }
}

/// Replays a fixed sequence of draws.
///
/// Running dry or meeting a value outside the requested range is reported as
/// a randomness failure.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCoin {
    draws: VecDeque<u32>,
}

impl ScriptedCoin {
    pub fn new<I: IntoIterator<Item = u32>>(draws: I) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Script of fair flips landing on the given sides in order.
    pub fn from_sides(sides: &[Side]) -> Self {
        Self::new(sides.iter().map(|s| match s {
            Side::Heads => 0,
            Side::Tails => 1,
        }))
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl CoinSource for ScriptedCoin {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        check_bound(bound)?;
        let value = self
            .draws
            .pop_front()
            .ok_or_else(|| MatchError::Randomness("scripted draws exhausted".into()))?;
        if value >= bound {
            return Err(MatchError::Randomness(format!(
                "scripted draw {} outside 0..{}",
                value, bound
            )));
        }
        Ok(value)
    }
}

/// Wraps another source and keeps every value it hands out.
#[derive(Debug, Clone)]
pub struct RecordingCoin<C> {
    inner: C,
    draws: Vec<u32>,
}

impl<C> RecordingCoin<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            draws: Vec::new(),
        }
    }

    pub fn draws(&self) -> &[u32] {
        &self.draws
    }

    pub fn into_draws(self) -> Vec<u32> {
        self.draws
    }
}

impl<C: CoinSource> CoinSource for RecordingCoin<C> {
    fn draw_below(&mut self, bound: u32) -> Result<u32, MatchError> {
        let value = self.inner.draw_below(bound)?;
        self.draws.push(value);
        Ok(value)
    }
}

/// Flips a single fair coin.
///
/// # Examples
///
/// ```
/// use coinduel_engine::coin::{flip, ScriptedCoin};
/// use coinduel_engine::side::Side;
///
/// let mut coin = ScriptedCoin::new([1]);
/// assert_eq!(flip(&mut coin).unwrap(), Side::Tails);
/// ```
pub fn flip<C: CoinSource>(mut coin: C) -> Result<Side, MatchError> {
    coin.draw_below(2).map(Side::from_bit)
}
