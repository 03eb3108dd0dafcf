//! Probabilistic reset to the origin at configured steps

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;

/// Step indices (1-based) at which the walker may snap back to the origin
///
/// Entries are kept as given: a step listed twice gets two independent coin
/// flips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartPolicy {
    steps: Vec<u32>,
}

impl RestartPolicy {
    pub fn new(steps: Vec<u32>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[u32] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Position after the restart check for `step`
    pub fn apply<R: RandomSource + ?Sized>(
        &self,
        position: DVec2,
        step: u32,
        rng: &mut R,
    ) -> DVec2 {
        for _ in self.steps.iter().filter(|&&s| s == step) {
            if rng.coin_flip() {
                log::debug!("restart at step {step}");
                return DVec2::ZERO;
            }
        }
        position
    }
}
