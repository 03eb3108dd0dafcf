//! Simulation loop
//!
//! Runs every simulation of a set to completion, one after another, feeding
//! each committed step into a shared [`StatisticsAccumulator`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::restart::RestartPolicy;
use super::stats::{Statistics, StatisticsAccumulator};
use super::terrain::Terrain;
use super::walker::{Walker, WalkerType};

/// Everything the engine needs for one simulation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub walker_type: WalkerType,
    pub num_simulations: u32,
    pub num_steps: u32,
    pub terrain: Terrain,
    pub restart: RestartPolicy,
}

impl SimulationParams {
    /// Open plane, no restarts
    pub fn new(walker_type: WalkerType, num_simulations: u32, num_steps: u32) -> Self {
        Self {
            walker_type,
            num_simulations,
            num_steps,
            terrain: Terrain::default(),
            restart: RestartPolicy::default(),
        }
    }
}

/// A single committed step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub old: DVec2,
    pub new: DVec2,
}

/// Averaged statistics plus the raw path of every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub statistics: Statistics,
    /// The origin, then every committed position of every run in order
    pub path: Vec<DVec2>,
}

/// Runs simulation sets for fixed parameters
#[derive(Debug, Clone)]
pub struct Simulator {
    params: SimulationParams,
}

impl Simulator {
    pub fn new(params: SimulationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Advance `walker` by one step and commit the result
    ///
    /// Order: propose, obstacles, gates (only if the move survived),
    /// restart, commit.
    pub fn advance<R: RandomSource + ?Sized>(
        &self,
        walker: &mut Walker,
        step: u32,
        rng: &mut R,
    ) -> StepOutcome {
        let old = walker.position();
        let candidate = walker.propose(&self.params.walker_type, rng);
        let resolved = self.params.terrain.resolve(old, candidate);
        let new = self.params.restart.apply(resolved, step, rng);
        walker.set_position(new);
        StepOutcome { old, new }
    }

    /// Run the whole set and reduce the statistics
    pub fn run<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SimulationReport {
        let params = &self.params;
        log::info!(
            "Running {} simulations x {} steps (walker type {}, {} restart steps)",
            params.num_simulations,
            params.num_steps,
            params.walker_type.code(),
            params.restart.steps().len(),
        );
        if params.terrain.is_empty() {
            log::debug!("Open plane, no obstacles or gates");
        } else {
            log::debug!(
                "Terrain: {} obstacles, {} gates",
                params.terrain.obstacles.len(),
                params.terrain.gates.len()
            );
        }

        let mut stats = StatisticsAccumulator::new(params.num_steps);
        let mut path = vec![DVec2::ZERO];

        for sim in 0..params.num_simulations {
            let mut walker = Walker::new();
            stats.begin_run();

            for step in 1..=params.num_steps {
                let outcome = self.advance(&mut walker, step, rng);
                stats.record(step, outcome.old, outcome.new);
                path.push(outcome.new);
            }

            log::debug!(
                "Simulation {} ended at ({:.3}, {:.3}) after {} y-axis crossings",
                sim + 1,
                walker.position().x,
                walker.position().y,
                stats.current_crossings()
            );
            stats.end_run();
        }

        let runs = stats.runs();
        let statistics = stats.finalize();
        log::info!(
            "Finished {runs} runs: mean time to leave radius {:.3}, mean last distance {:.3}",
            statistics.time_to_leave_radius.summary.mean_time_to_leave,
            statistics.time_to_leave_radius.summary.mean_last_distance
        );

        SimulationReport { statistics, path }
    }
}
