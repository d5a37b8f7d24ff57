//! Authored control points of a closed track.

use coaster_core::{CoasterError, Result, Tolerance};
use coaster_math::Point3;
use serde::{Deserialize, Serialize};

/// Ordered control points of a closed loop.
///
/// An explicit closing point (last equal to first) is folded away on
/// construction, so segment `i` always runs from point `i` to point
/// `(i + 1) % len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    points: Vec<Point3>,
}

impl ControlPoints {
    /// Build a loop from authored points.
    ///
    /// Fails on non-finite coordinates, on consecutive coincident points and
    /// when fewer than `min_points` distinct points remain after folding
    /// the closing point.
    pub fn new(points: Vec<Point3>, min_points: usize, tol: Tolerance) -> Result<Self> {
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(CoasterError::configuration(format!(
                "control point {i} is not finite: {p}"
            )));
        }

        let mut points = points;
        if points.len() >= 2 {
            let first = points[0];
            let last = points[points.len() - 1];
            if tol.is_zero(first.distance(last)) {
                points.pop();
            }
        }

        let min_points = min_points.max(2);
        if points.len() < min_points {
            return Err(CoasterError::configuration(format!(
                "closed track needs at least {min_points} distinct control points, got {}",
                points.len()
            )));
        }

        let n = points.len();
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            if tol.is_zero(a.distance(b)) {
                return Err(CoasterError::configuration(format!(
                    "control points {i} and {} coincide at {a}",
                    (i + 1) % n
                )));
            }
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at a signed index, wrapped around the loop.
    pub fn wrapped(&self, i: isize) -> Point3 {
        let n = self.points.len() as isize;
        self.points[i.rem_euclid(n) as usize]
    }

    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    /// Split a parameter in `[0, 1)` into a segment index and a local parameter in `[0, 1)`.
    pub fn locate(&self, t: f64) -> (usize, f64) {
        let n = self.points.len();
        let scaled = t * n as f64;
        let seg = (scaled.floor().max(0.0) as usize).min(n - 1);
        let local = (scaled - seg as f64).clamp(0.0, 1.0);
        (seg, local)
    }
}
