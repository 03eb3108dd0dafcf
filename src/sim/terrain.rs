//! Obstacles and gates
//!
//! Obstacles cancel any step whose path touches them. Gates are polylines
//! that teleport the walker to a goal point when a step crosses any edge.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;

/// A blocking segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub segment: Segment,
}

impl Obstacle {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            segment: Segment::new(start, end),
        }
    }

    /// Whether the step old -> candidate touches this obstacle
    #[inline]
    pub fn blocks(&self, old: DVec2, candidate: DVec2) -> bool {
        Segment::new(old, candidate).intersects(&self.segment)
    }
}

/// A polyline that redirects crossing steps to `goal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// At least two vertices, walked pairwise in order
    pub vertices: Vec<DVec2>,
    pub goal: DVec2,
}

impl Gate {
    pub fn new(vertices: Vec<DVec2>, goal: DVec2) -> Self {
        Self { vertices, goal }
    }

    /// Consecutive vertex pairs in polyline order
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Whether the step old -> candidate crosses any edge
    pub fn captures(&self, old: DVec2, candidate: DVec2) -> bool {
        let step = Segment::new(old, candidate);
        self.edges().any(|(a, b)| step.intersects(&Segment::new(a, b)))
    }
}

/// Cancel the move if any obstacle blocks it (first match wins)
pub fn resolve_obstacle(old: DVec2, candidate: DVec2, obstacles: &[Obstacle]) -> DVec2 {
    if obstacles.iter().any(|o| o.blocks(old, candidate)) {
        old
    } else {
        candidate
    }
}

/// Redirect to the goal of the first gate whose polyline the move crosses
pub fn resolve_gate(old: DVec2, candidate: DVec2, gates: &[Gate]) -> DVec2 {
    gates
        .iter()
        .find(|gate| gate.captures(old, candidate))
        .map_or(candidate, |gate| gate.goal)
}

/// Static geometry of the plane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub obstacles: Vec<Obstacle>,
    pub gates: Vec<Gate>,
}

impl Terrain {
    pub fn new(obstacles: Vec<Obstacle>, gates: Vec<Gate>) -> Self {
        Self { obstacles, gates }
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.gates.is_empty()
    }

    /// Obstacle check, then the gate check only if the move survived
    pub fn resolve(&self, old: DVec2, candidate: DVec2) -> DVec2 {
        let position = resolve_obstacle(old, candidate, &self.obstacles);
        if position != old {
            resolve_gate(old, position, &self.gates)
        } else {
            position
        }
    }
}
