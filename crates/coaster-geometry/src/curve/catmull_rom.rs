//! Closed uniform Catmull-Rom spline.

use coaster_math::{wrap_unit, Point3, Vector3};

use super::Curve;
use crate::control_points::ControlPoints;

/// Uniform Catmull-Rom spline through every control point of a closed loop,
/// parameterized over `[0, 1)` with one equal-width parameter span per segment.
#[derive(Debug, Clone)]
pub struct CatmullRomLoop {
    points: ControlPoints,
}

/// Hermite form of one segment: `p(u) = a u^3 + b u^2 + c u + d`.
struct Cubic {
    a: Vector3,
    b: Vector3,
    c: Vector3,
    d: Point3,
}

impl Cubic {
    fn from_neighbours(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        let m1 = (p2 - p0) * 0.5;
        let m2 = (p3 - p1) * 0.5;
        Self {
            a: 2.0 * p1 - 2.0 * p2 + m1 + m2,
            b: -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2,
            c: m1,
            d: p1,
        }
    }

    fn eval(&self, u: f64) -> Point3 {
        ((self.a * u + self.b) * u + self.c) * u + self.d
    }

    fn derivative(&self, u: f64) -> Vector3 {
        (self.a * (3.0 * u) + self.b * 2.0) * u + self.c
    }
}

impl CatmullRomLoop {
    pub fn new(points: ControlPoints) -> Self {
        Self { points }
    }

    fn cubic(&self, t: f64) -> (Cubic, f64) {
        let (seg, local) = self.points.locate(wrap_unit(t));
        let i = seg as isize;
        let cubic = Cubic::from_neighbours(
            self.points.wrapped(i - 1),
            self.points.wrapped(i),
            self.points.wrapped(i + 1),
            self.points.wrapped(i + 2),
        );
        (cubic, local)
    }
}

impl Curve for CatmullRomLoop {
    fn point_at(&self, t: f64) -> Point3 {
        let (cubic, u) = self.cubic(t);
        cubic.eval(u)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let (cubic, u) = self.cubic(t);
        cubic.derivative(u) * self.points.len() as f64
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
