//! Deterministic simulation module
//!
//! All walk logic lives here. This module must be pure and deterministic:
//! - Every random draw comes from a caller-supplied `RandomSource`
//! - Runs execute sequentially, in order
//! - No file, terminal or platform dependencies

pub mod engine;
pub mod geometry;
pub mod random;
pub mod restart;
pub mod stats;
pub mod terrain;
pub mod walker;

pub use engine::{SimulationParams, SimulationReport, Simulator, StepOutcome};
pub use geometry::{Orientation, Segment, on_segment, orientation, segments_intersect};
pub use random::{RandomSource, seeded_rng};
pub use restart::RestartPolicy;
pub use stats::{LeaveSummary, PlotSeries, Statistics, StatisticsAccumulator, TimeToLeave};
pub use terrain::{Gate, Obstacle, Terrain, resolve_gate, resolve_obstacle};
pub use walker::{BiasConfig, BiasDirection, Walker, WalkerType};
