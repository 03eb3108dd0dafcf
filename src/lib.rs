//! Random Walk - Monte Carlo simulation of a walker on the plane
//!
//! Core modules:
//! - `sim`: Deterministic simulation (walkers, segment geometry, obstacles, gates, statistics)
//! - `config`: JSON configuration loading and validation
//! - `report`: Plain-text rendering of the final statistics

pub mod config;
pub mod report;
pub mod sim;

pub use config::{ConfigError, SimulationConfig};
pub use sim::{SimulationReport, Simulator, Statistics};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Radius whose first exit is timed per run
    pub const LEAVE_RADIUS: f64 = 10.0;
    /// Per-step series are sampled every this many steps
    pub const SAMPLE_STRIDE: u32 = 5;

    /// Step length bounds for the random-length walker (inclusive)
    pub const MIN_STEP_LENGTH: f64 = 0.5;
    pub const MAX_STEP_LENGTH: f64 = 1.5;

    /// Accepted configuration ranges
    pub const MAX_SIMULATIONS: u32 = 10_000;
    pub const MAX_STEPS: u32 = 10_000;
    pub const MAX_BIAS_PERCENT: u8 = 100;

    /// Probability that a matching restart step resets the walker
    pub const RESTART_PROBABILITY: f64 = 0.5;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Strict sign change of a coordinate (touching zero is not a crossing)
#[inline]
pub fn crosses_zero(before: f64, after: f64) -> bool {
    (before > 0.0 && after < 0.0) || (before < 0.0 && after > 0.0)
}

/// Arithmetic mean, 0 for an empty slice
#[inline]
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}
