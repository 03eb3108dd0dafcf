//! Walker state and step policies
//!
//! A walker only proposes candidate positions. The engine decides what
//! actually happens (obstacles, gates, restarts) and commits the result with
//! [`Walker::set_position`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::consts::{MAX_STEP_LENGTH, MIN_STEP_LENGTH};
use crate::polar_to_cartesian;

/// Unit moves available to the four-direction walker
pub const AXIS_MOVES: [DVec2; 4] = [
    DVec2::new(1.0, 0.0),
    DVec2::new(-1.0, 0.0),
    DVec2::new(0.0, 1.0),
    DVec2::new(0.0, -1.0),
];

/// The five discrete moves of the biased walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasDirection {
    Up,
    Down,
    /// Moves toward +x
    Left,
    /// Moves toward -x
    Right,
    /// One unit toward the origin on each axis independently
    TowardsOrigin,
}

impl BiasDirection {
    /// Sampling order of the biased walker's weight table
    pub const ALL: [BiasDirection; 5] = [
        BiasDirection::Up,
        BiasDirection::Down,
        BiasDirection::Left,
        BiasDirection::Right,
        BiasDirection::TowardsOrigin,
    ];

    /// Fixed displacement, or `None` for the position-dependent origin move
    pub fn offset(self) -> Option<DVec2> {
        match self {
            BiasDirection::Up => Some(DVec2::new(0.0, 1.0)),
            BiasDirection::Down => Some(DVec2::new(0.0, -1.0)),
            BiasDirection::Left => Some(DVec2::new(1.0, 0.0)),
            BiasDirection::Right => Some(DVec2::new(-1.0, 0.0)),
            BiasDirection::TowardsOrigin => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BiasDirection::Up => "up",
            BiasDirection::Down => "down",
            BiasDirection::Left => "left",
            BiasDirection::Right => "right",
            BiasDirection::TowardsOrigin => "beginning of axis",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "up" => Some(BiasDirection::Up),
            "down" => Some(BiasDirection::Down),
            "left" => Some(BiasDirection::Left),
            "right" => Some(BiasDirection::Right),
            "beginning of axis" => Some(BiasDirection::TowardsOrigin),
            _ => None,
        }
    }
}

/// Extra weight on one biased move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasConfig {
    pub direction: BiasDirection,
    /// Added to the chosen move's base weight of 1.0 as `increase_percent / 100`
    pub increase_percent: u8,
}

impl BiasConfig {
    /// Normalized probabilities in [`BiasDirection::ALL`] order
    pub fn probabilities(&self) -> [f64; 5] {
        let mut weights = [1.0; 5];
        for (weight, dir) in weights.iter_mut().zip(BiasDirection::ALL) {
            if dir == self.direction {
                *weight += f64::from(self.increase_percent) / 100.0;
            }
        }
        let total: f64 = weights.iter().sum();
        weights.map(|w| w / total)
    }
}

/// Movement policy, fixed for a whole simulation set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WalkerType {
    /// Unit step in a uniformly random direction
    UnitRandomAngle,
    /// Random direction, length uniform in [0.5, 1.5]
    RandomAngleRandomLength,
    /// Unit step along one of the four axis directions
    FourDirectionAxis,
    /// Weighted choice among the five [`BiasDirection`] moves
    Biased(BiasConfig),
}

impl WalkerType {
    /// Configuration code (1-4)
    pub fn code(&self) -> u8 {
        match self {
            WalkerType::UnitRandomAngle => 1,
            WalkerType::RandomAngleRandomLength => 2,
            WalkerType::FourDirectionAxis => 3,
            WalkerType::Biased(_) => 4,
        }
    }
}

/// The simulated point
#[derive(Debug, Clone, Default)]
pub struct Walker {
    position: DVec2,
}

impl Walker {
    /// New walker at the origin
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Candidate for the configured policy
    pub fn propose<R: RandomSource + ?Sized>(
        &self,
        walker_type: &WalkerType,
        rng: &mut R,
    ) -> DVec2 {
        match walker_type {
            WalkerType::UnitRandomAngle => self.unit_random_step(rng),
            WalkerType::RandomAngleRandomLength => self.random_length_step(rng),
            WalkerType::FourDirectionAxis => self.four_direction_step(rng),
            WalkerType::Biased(bias) => self.biased_step(bias, rng),
        }
    }

    pub fn unit_random_step<R: RandomSource + ?Sized>(&self, rng: &mut R) -> DVec2 {
        let theta = rng.direction_degrees().to_radians();
        self.position + polar_to_cartesian(1.0, theta)
    }

    pub fn random_length_step<R: RandomSource + ?Sized>(&self, rng: &mut R) -> DVec2 {
        let theta = rng.direction_degrees().to_radians();
        let length = rng.uniform_inclusive(MIN_STEP_LENGTH, MAX_STEP_LENGTH);
        self.position + polar_to_cartesian(length, theta)
    }

    pub fn four_direction_step<R: RandomSource + ?Sized>(&self, rng: &mut R) -> DVec2 {
        self.position + AXIS_MOVES[rng.pick(AXIS_MOVES.len())]
    }

    pub fn biased_step<R: RandomSource + ?Sized>(&self, bias: &BiasConfig, rng: &mut R) -> DVec2 {
        let chosen = BiasDirection::ALL[rng.pick_weighted(&bias.probabilities())];
        match chosen.offset() {
            Some(offset) => self.position + offset,
            None => self.step_towards_origin(),
        }
    }

    /// One unit toward zero on each axis; a zero coordinate stays put
    pub fn step_towards_origin(&self) -> DVec2 {
        let toward = |v: f64| {
            if v > 0.0 {
                v - 1.0
            } else if v < 0.0 {
                v + 1.0
            } else {
                v
            }
        };
        DVec2::new(toward(self.position.x), toward(self.position.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::scripted::ScriptedSource;
    use crate::sim::random::seeded_rng;
    use proptest::prelude::*;

    fn walker_at(x: f64, y: f64) -> Walker {
        let mut walker = Walker::new();
        walker.set_position(DVec2::new(x, y));
        walker
    }

    #[test]
    fn test_new_walker_starts_at_origin() {
        assert_eq!(Walker::new().position(), DVec2::ZERO);
    }

    #[test]
    fn test_step_does_not_commit() {
        let walker = Walker::new();
        let mut rng = seeded_rng(1);
        let _ = walker.unit_random_step(&mut rng);
        assert_eq!(walker.position(), DVec2::ZERO);
    }

    #[test]
    fn test_set_position_replaces() {
        let mut walker = walker_at(3.0, 4.0);
        walker.set_position(DVec2::new(-1.0, 0.5));
        assert_eq!(walker.position(), DVec2::new(-1.0, 0.5));
    }

    #[test]
    fn test_unit_step_direction() {
        let walker = walker_at(1.0, 1.0);
        let mut rng = ScriptedSource::default();
        rng.degrees.push_back(90.0);
        let next = walker.unit_random_step(&mut rng);
        assert!((next.x - 1.0).abs() < 1e-12);
        assert!((next.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_four_direction_moves_in_order() {
        let walker = Walker::new();
        for (index, expected) in AXIS_MOVES.iter().enumerate() {
            let mut rng = ScriptedSource::always_pick(index);
            assert_eq!(walker.four_direction_step(&mut rng), *expected);
        }
    }

    #[test]
    fn test_biased_index_mapping() {
        let walker = walker_at(2.0, -3.0);
        let bias = BiasConfig {
            direction: BiasDirection::Up,
            increase_percent: 50,
        };
        let expected = [
            DVec2::new(2.0, -2.0), // up
            DVec2::new(2.0, -4.0), // down
            DVec2::new(3.0, -3.0), // left -> +x
            DVec2::new(1.0, -3.0), // right -> -x
            DVec2::new(1.0, -2.0), // towards origin
        ];
        for (index, want) in expected.iter().enumerate() {
            let mut rng = ScriptedSource::always_pick(index);
            assert_eq!(walker.biased_step(&bias, &mut rng), *want);
        }
    }

    #[test]
    fn test_towards_origin_leaves_zero_axis() {
        assert_eq!(walker_at(0.0, 5.0).step_towards_origin(), DVec2::new(0.0, 4.0));
        assert_eq!(walker_at(-2.0, 0.0).step_towards_origin(), DVec2::new(-1.0, 0.0));
        assert_eq!(Walker::new().step_towards_origin(), DVec2::ZERO);
    }

    #[test]
    fn test_bias_probabilities() {
        let flat = BiasConfig {
            direction: BiasDirection::Down,
            increase_percent: 0,
        };
        for prob in flat.probabilities() {
            assert!((prob - 0.2).abs() < 1e-12);
        }

        let skewed = BiasConfig {
            direction: BiasDirection::Up,
            increase_percent: 100,
        };
        let probs = skewed.probabilities();
        assert!((probs[0] - 2.0 / 6.0).abs() < 1e-12);
        assert!((probs[1] - 1.0 / 6.0).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_towards_origin_bias_weights_last_slot() {
        let bias = BiasConfig {
            direction: BiasDirection::TowardsOrigin,
            increase_percent: 40,
        };
        let probs = bias.probabilities();
        assert!(probs[4] > probs[0]);
        assert!((probs[0] - probs[3]).abs() < 1e-12);
    }

    #[test]
    fn test_direction_names_roundtrip() {
        for dir in BiasDirection::ALL {
            assert_eq!(BiasDirection::from_str(dir.as_str()), Some(dir));
        }
        assert_eq!(BiasDirection::from_str("sideways"), None);
    }

    #[test]
    fn test_propose_dispatch_codes() {
        assert_eq!(WalkerType::UnitRandomAngle.code(), 1);
        assert_eq!(WalkerType::RandomAngleRandomLength.code(), 2);
        assert_eq!(WalkerType::FourDirectionAxis.code(), 3);
        let biased = WalkerType::Biased(BiasConfig {
            direction: BiasDirection::Left,
            increase_percent: 10,
        });
        assert_eq!(biased.code(), 4);

        let walker = Walker::new();
        let mut rng = ScriptedSource::always_pick(2);
        assert_eq!(walker.propose(&biased, &mut rng), DVec2::new(1.0, 0.0));
    }

    proptest! {
        #[test]
        fn unit_step_has_unit_length(seed in any::<u64>(), x in -50.0f64..50.0, y in -50.0f64..50.0) {
            let walker = walker_at(x, y);
            let mut rng = seeded_rng(seed);
            let step = walker.unit_random_step(&mut rng) - walker.position();
            prop_assert!((step.length() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn random_length_step_in_bounds(seed in any::<u64>(), x in -50.0f64..50.0, y in -50.0f64..50.0) {
            let walker = walker_at(x, y);
            let mut rng = seeded_rng(seed);
            let len = (walker.random_length_step(&mut rng) - walker.position()).length();
            prop_assert!(len >= MIN_STEP_LENGTH - 1e-9 && len <= MAX_STEP_LENGTH + 1e-9);
        }

        #[test]
        fn four_direction_step_is_axis_unit(seed in any::<u64>(), x in -50i32..50, y in -50i32..50) {
            let walker = walker_at(x as f64, y as f64);
            let mut rng = seeded_rng(seed);
            let step = walker.four_direction_step(&mut rng) - walker.position();
            prop_assert!(AXIS_MOVES.contains(&step));
        }

        #[test]
        fn biased_step_is_known_move(
            seed in any::<u64>(),
            x in -20i32..20,
            y in -20i32..20,
            dir in 0usize..5,
            pct in 0u8..=100,
        ) {
            let walker = walker_at(x as f64, y as f64);
            let bias = BiasConfig { direction: BiasDirection::ALL[dir], increase_percent: pct };
            let mut rng = seeded_rng(seed);
            let next = walker.biased_step(&bias, &mut rng);
            let fixed = BiasDirection::ALL
                .iter()
                .filter_map(|d| d.offset())
                .any(|offset| walker.position() + offset == next);
            prop_assert!(fixed || next == walker.step_towards_origin());
        }
    }
}
