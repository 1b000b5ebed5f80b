//! Turtle state and operations for planar interpretation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Direction components smaller than this are treated as exactly zero, so
/// right-angle grammars land on integer lattice points.
const SNAP_EPSILON: f64 = 1e-12;

/// The state of the drawing turtle.
///
/// A plain value: `[` pushes a copy, `]` restores it wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current position of the pen in path space.
    pub position: DVec2,

    /// Current heading in degrees, counter-clockwise from the +X axis.
    pub heading: f64,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            heading: 0.0,
        }
    }
}

impl TurtleState {
    /// Unit vector along the current heading.
    pub fn direction(&self) -> DVec2 {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let snap = |v: f64| if v.abs() < SNAP_EPSILON { 0.0 } else { v };
        DVec2::new(snap(cos), snap(sin))
    }

    /// Rotates the heading by `degrees`, keeping it within `[0, 360)`.
    pub fn turn(&mut self, degrees: f64) {
        self.heading = (self.heading + degrees).rem_euclid(360.0);
    }

    /// Moves `length` units along the heading and returns the new position.
    pub fn advance(&mut self, length: f64) -> DVec2 {
        self.position += self.direction() * length;
        self.position
    }
}

/// Operations that can be performed by the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Move forward one step drawing a segment (`F`).
    Draw,
    /// Move forward one step without drawing (`f`).
    Move,
    /// Rotate by the grammar angle times the sign (`+`/`-`).
    Turn(f64),
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Save the turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed turtle state (`]`).
    Pop,
    /// No-op: symbol has no registered meaning.
    Ignore,
}
