//! Geometry produced by the turtle: segments and their bounding box.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single drawn line segment in path space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: DVec2,
    pub to: DVec2,
}

impl Segment {
    pub fn new(from: DVec2, to: DVec2) -> Self {
        Self { from, to }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// A zero-size box at `p`.
    pub fn at(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test with an absolute tolerance.
    pub fn contains(&self, p: DVec2, tolerance: f64) -> bool {
        p.cmpge(self.min - DVec2::splat(tolerance)).all()
            && p.cmple(self.max + DVec2::splat(tolerance)).all()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::at(DVec2::ZERO)
    }
}

/// The ordered segments drawn by one turtle walk.
///
/// `bounds` covers every point the turtle visited, including pen-up moves
/// and branch excursions, so it can be larger than the segments alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub segments: Vec<Segment>,
    pub bounds: Bounds,
}

impl Path {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Groups consecutive segments that share endpoints into polylines.
    ///
    /// Each run is a list of at least two points; a new run starts wherever
    /// a segment does not begin where the previous one ended.
    pub fn runs(&self) -> Vec<Vec<DVec2>> {
        let mut runs: Vec<Vec<DVec2>> = Vec::new();
        for seg in &self.segments {
            match runs.last_mut() {
                Some(run) if run.last() == Some(&seg.from) => run.push(seg.to),
                _ => runs.push(vec![seg.from, seg.to]),
            }
        }
        runs
    }
}
