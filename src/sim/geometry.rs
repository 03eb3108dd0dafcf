//! Segment intersection for straight-line geometry
//!
//! Every step is a straight segment from the old position to the candidate,
//! and every obstacle or gate edge is a segment too, so all blocking logic
//! reduces to one orientation-based intersection test.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Turn direction of an ordered point triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// A straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }
}

/// Orientation of (p, q, r)
///
/// Exact comparison against zero: integer and simple fractional inputs
/// classify collinear triples exactly, and there is no tolerance band.
#[inline]
pub fn orientation(p: DVec2, q: DVec2, r: DVec2) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `p` lies in the closed bounding box of `q` and `r`
#[inline]
pub fn on_segment(p: DVec2, q: DVec2, r: DVec2) -> bool {
    p.x >= q.x.min(r.x) && p.x <= q.x.max(r.x) && p.y >= q.y.min(r.y) && p.y <= q.y.max(r.y)
}

/// Check whether segment a1-a2 touches or crosses segment b1-b2
///
/// Shared endpoints and collinear overlap count as intersections. Zero-length
/// segments are handled by the collinear branch.
pub fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    // Proper crossing: each segment straddles the other's line
    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(b1, a1, a2))
        || (o2 == Orientation::Collinear && on_segment(b2, a1, a2))
        || (o3 == Orientation::Collinear && on_segment(a1, b1, b2))
        || (o4 == Orientation::Collinear && on_segment(a2, b1, b2))
}
