//! Random source abstraction
//!
//! Every draw the simulation makes goes through [`RandomSource`], so a run is
//! reproducible from its seed and tests can script individual draws.

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::RESTART_PROBABILITY;

/// Draws needed by walkers and the restart policy
pub trait RandomSource {
    /// Direction in degrees, uniform in [0, 360)
    fn direction_degrees(&mut self) -> f64;

    /// Uniform value in the closed range [low, high]
    fn uniform_inclusive(&mut self, low: f64, high: f64) -> f64;

    /// Uniform index in 0..len
    fn pick(&mut self, len: usize) -> usize;

    /// Index sampled proportionally to `weights`
    fn pick_weighted(&mut self, weights: &[f64]) -> usize;

    /// Fair coin
    fn coin_flip(&mut self) -> bool;
}

impl<R: Rng> RandomSource for R {
    fn direction_degrees(&mut self) -> f64 {
        self.random_range(0.0..360.0)
    }

    fn uniform_inclusive(&mut self, low: f64, high: f64) -> f64 {
        self.random_range(low..=high)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        match WeightedIndex::new(weights) {
            Ok(dist) => dist.sample(self),
            Err(err) => {
                log::warn!("invalid weights {weights:?}: {err}, falling back to first entry");
                0
            }
        }
    }

    fn coin_flip(&mut self) -> bool {
        self.random_bool(RESTART_PROBABILITY)
    }
}

/// Seeded generator used by the binary and determinism tests
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[cfg(test)]
pub(crate) mod scripted {
    //! Deterministic doubles for forcing specific draws in tests

    use std::collections::VecDeque;

    use super::RandomSource;

    /// Replays queued answers; falls back to fixed defaults once drained
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        pub degrees: VecDeque<f64>,
        pub lengths: VecDeque<f64>,
        pub picks: VecDeque<usize>,
        pub coins: VecDeque<bool>,
        /// Answer for `coin_flip` once `coins` is empty
        pub default_coin: bool,
        /// Answer for `pick`/`pick_weighted` once `picks` is empty
        pub default_pick: usize,
    }

    impl ScriptedSource {
        pub fn always_pick(index: usize) -> Self {
            Self {
                default_pick: index,
                ..Default::default()
            }
        }

        pub fn always_heads(index: usize) -> Self {
            Self {
                default_pick: index,
                default_coin: true,
                ..Default::default()
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn direction_degrees(&mut self) -> f64 {
            self.degrees.pop_front().unwrap_or(0.0)
        }

        fn uniform_inclusive(&mut self, low: f64, _high: f64) -> f64 {
            self.lengths.pop_front().unwrap_or(low)
        }

        fn pick(&mut self, len: usize) -> usize {
            self.picks.pop_front().unwrap_or(self.default_pick) % len
        }

        fn pick_weighted(&mut self, weights: &[f64]) -> usize {
            self.picks.pop_front().unwrap_or(self.default_pick) % weights.len()
        }

        fn coin_flip(&mut self) -> bool {
            self.coins.pop_front().unwrap_or(self.default_coin)
        }
    }
}
