//! Curve traits and closed-loop implementations.

mod catmull_rom;
mod linear;

use coaster_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub use catmull_rom::CatmullRomLoop;
pub use linear::PolylineLoop;

use crate::control_points::ControlPoints;

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Evaluate the derivative `dP/dt` at parameter `t` (not normalized).
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);
}

/// Interpolation basis used between control points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationPolicy {
    /// Straight segments; the tangent jumps at every control point.
    Linear,
    /// Uniform Catmull-Rom through every control point, C1 continuous.
    #[default]
    CatmullRom,
}

impl InterpolationPolicy {
    /// Fewest distinct control points the basis needs to form a loop.
    pub fn min_control_points(self) -> usize {
        match self {
            Self::Linear => 3,
            Self::CatmullRom => 4,
        }
    }

    /// Build the closed curve for this policy.
    pub fn build(self, points: ControlPoints) -> Box<dyn Curve> {
        match self {
            Self::Linear => Box::new(PolylineLoop::new(points)),
            Self::CatmullRom => Box::new(CatmullRomLoop::new(points)),
        }
    }
}
