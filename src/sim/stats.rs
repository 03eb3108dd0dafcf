//! Cross-run statistics
//!
//! Samples are collected per sampled step while runs execute, then reduced
//! to arithmetic means by [`StatisticsAccumulator::finalize`].

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LEAVE_RADIUS, SAMPLE_STRIDE};
use crate::{crosses_zero, mean};

/// Series names, as used by the results file and plotting sinks
pub const DISTANCE_FROM_ORIGIN: &str = "average_distance_from_origin";
pub const TIME_TO_LEAVE_RADIUS: &str = "average_time_to_leave_radius_10";
pub const DISTANCE_FROM_Y_AXIS: &str = "average_distance_from_y_axis";
pub const DISTANCE_FROM_X_AXIS: &str = "average_distance_from_x_axis";
pub const CROSSED_Y_AXIS: &str = "crossed_y_axis";

/// Steps at which per-step series are sampled: 0, 5, 10, ... and the last step
pub fn sampled_steps(num_steps: u32) -> Vec<u32> {
    let mut steps: Vec<u32> = (0..=num_steps).step_by(SAMPLE_STRIDE as usize).collect();
    if num_steps % SAMPLE_STRIDE != 0 {
        steps.push(num_steps);
    }
    steps
}

/// Raw samples for one per-step series
#[derive(Debug, Clone, Default)]
struct StepSeries {
    samples: BTreeMap<u32, Vec<f64>>,
}

impl StepSeries {
    /// Keys at the sampled steps, step 0 seeded with a single zero sample
    fn sampled(num_steps: u32) -> Self {
        let mut samples: BTreeMap<u32, Vec<f64>> = sampled_steps(num_steps)
            .into_iter()
            .map(|step| (step, Vec::new()))
            .collect();
        samples.insert(0, vec![0.0]);
        Self { samples }
    }

    /// Append a sample; ignored for steps that are not sampled
    fn push(&mut self, step: u32, value: f64) {
        if let Some(samples) = self.samples.get_mut(&step) {
            samples.push(value);
        }
    }

    fn averages(&self) -> BTreeMap<u32, f64> {
        average_map(&self.samples)
    }
}

fn average_map(samples: &BTreeMap<u32, Vec<f64>>) -> BTreeMap<u32, f64> {
    samples
        .iter()
        .map(|(&step, values)| (step, mean(values)))
        .collect()
}

/// Per-run counters, reset at the start of every run
#[derive(Debug, Clone)]
struct RunTracker {
    /// Steps spent inside the radius before first leaving it
    time_to_leave: u32,
    /// Last distance observed while still inside the radius
    last_distance: f64,
    crossings: u32,
    /// False once the walker has been seen outside the radius
    inside: bool,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            time_to_leave: 0,
            last_distance: 0.0,
            crossings: 0,
            inside: true,
        }
    }
}

/// Collects samples across runs
#[derive(Debug, Clone)]
pub struct StatisticsAccumulator {
    distance_from_origin: StepSeries,
    distance_from_x_axis: StepSeries,
    distance_from_y_axis: StepSeries,
    crossed_y_axis: StepSeries,
    /// Distance samples keyed by every step spent inside the radius
    time_to_leave: BTreeMap<u32, Vec<f64>>,
    last_distances: Vec<f64>,
    leave_times: Vec<f64>,
    run: RunTracker,
}

impl StatisticsAccumulator {
    pub fn new(num_steps: u32) -> Self {
        Self {
            distance_from_origin: StepSeries::sampled(num_steps),
            distance_from_x_axis: StepSeries::sampled(num_steps),
            distance_from_y_axis: StepSeries::sampled(num_steps),
            crossed_y_axis: StepSeries::sampled(num_steps),
            time_to_leave: BTreeMap::new(),
            last_distances: Vec::new(),
            leave_times: Vec::new(),
            run: RunTracker::default(),
        }
    }

    /// Reset per-run counters
    pub fn begin_run(&mut self) {
        self.run = RunTracker::default();
    }

    /// Record one committed step of the current run
    pub fn record(&mut self, step: u32, old: DVec2, new: DVec2) {
        let distance = new.length();

        if distance < LEAVE_RADIUS && self.run.inside {
            self.run.time_to_leave += 1;
            self.run.last_distance = distance;
            self.time_to_leave.entry(step).or_default().push(distance);
        } else if distance > LEAVE_RADIUS {
            self.run.inside = false;
        }

        if crosses_zero(old.y, new.y) {
            self.run.crossings += 1;
        }

        if self.distance_from_origin.samples.contains_key(&step) {
            self.distance_from_origin.push(step, distance);
            self.distance_from_x_axis.push(step, new.y.abs());
            self.distance_from_y_axis.push(step, new.x.abs());
            self.crossed_y_axis.push(step, f64::from(self.run.crossings));
        }
    }

    /// Close the current run
    pub fn end_run(&mut self) {
        self.last_distances.push(self.run.last_distance);
        self.leave_times.push(f64::from(self.run.time_to_leave));
    }

    /// Number of completed runs
    pub fn runs(&self) -> usize {
        self.leave_times.len()
    }

    /// Crossings counted so far in the current run
    pub fn current_crossings(&self) -> u32 {
        self.run.crossings
    }

    /// Reduce every sample list to its mean (empty lists average to 0)
    pub fn finalize(self) -> Statistics {
        Statistics {
            average_distance_from_origin: self.distance_from_origin.averages(),
            average_distance_from_x_axis: self.distance_from_x_axis.averages(),
            average_distance_from_y_axis: self.distance_from_y_axis.averages(),
            crossed_y_axis: self.crossed_y_axis.averages(),
            time_to_leave_radius: TimeToLeave {
                per_step: average_map(&self.time_to_leave),
                summary: LeaveSummary {
                    mean_time_to_leave: mean(&self.leave_times),
                    mean_last_distance: mean(&self.last_distances),
                },
            },
        }
    }
}

/// Cross-run averages of the per-run leave counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaveSummary {
    /// Mean number of steps spent inside the radius before leaving it
    pub mean_time_to_leave: f64,
    /// Mean of each run's last distance observed inside the radius
    pub mean_last_distance: f64,
}

/// Time-to-leave statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeToLeave {
    /// Mean distance at each step spent inside the radius
    ///
    /// Keys are in ascending step order, not first-seen order; the two only
    /// differ when a run sits exactly on the radius at an earlier step.
    pub per_step: BTreeMap<u32, f64>,
    pub summary: LeaveSummary,
}

impl TimeToLeave {
    /// The per-step series with the summary stored as one more point
    ///
    /// The summary is keyed by the mean time to leave. When that key equals an
    /// existing step, the step's value is replaced in place; otherwise the
    /// summary is appended last. Only the results file and plotting use this
    /// combined view.
    pub fn merged_points(&self) -> Vec<(f64, f64)> {
        let key = self.summary.mean_time_to_leave;
        let value = self.summary.mean_last_distance;
        let mut replaced = false;
        let mut points: Vec<(f64, f64)> = self
            .per_step
            .iter()
            .map(|(&step, &avg)| {
                if f64::from(step) == key {
                    replaced = true;
                    (key, value)
                } else {
                    (f64::from(step), avg)
                }
            })
            .collect();
        if !replaced {
            points.push((key, value));
        }
        points
    }
}

/// One named series for a plotting sink
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: &'static str,
    pub points: Vec<(f64, f64)>,
}

/// Final averaged statistics of a simulation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub average_distance_from_origin: BTreeMap<u32, f64>,
    /// Mean |y|
    pub average_distance_from_x_axis: BTreeMap<u32, f64>,
    /// Mean |x|
    pub average_distance_from_y_axis: BTreeMap<u32, f64>,
    /// Mean cumulative y-axis crossings up to each step
    pub crossed_y_axis: BTreeMap<u32, f64>,
    pub time_to_leave_radius: TimeToLeave,
}

impl Statistics {
    /// Per-step series by name, in results-file order
    pub fn step_series(&self) -> [(&'static str, &BTreeMap<u32, f64>); 4] {
        [
            (DISTANCE_FROM_ORIGIN, &self.average_distance_from_origin),
            (DISTANCE_FROM_Y_AXIS, &self.average_distance_from_y_axis),
            (DISTANCE_FROM_X_AXIS, &self.average_distance_from_x_axis),
            (CROSSED_Y_AXIS, &self.crossed_y_axis),
        ]
    }

    /// The five series a plotting sink draws
    pub fn plot_series(&self) -> Vec<PlotSeries> {
        let mut series: Vec<PlotSeries> = self
            .step_series()
            .into_iter()
            .map(|(name, values)| PlotSeries {
                name,
                points: values.iter().map(|(&k, &v)| (f64::from(k), v)).collect(),
            })
            .collect();
        series.insert(
            1,
            PlotSeries {
                name: TIME_TO_LEAVE_RADIUS,
                points: self.time_to_leave_radius.merged_points(),
            },
        );
        series
    }
}
