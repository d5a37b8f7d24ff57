//! Closed polyline curve.

use coaster_math::{wrap_unit, Point3, Vector3};

use super::Curve;
use crate::control_points::ControlPoints;

/// Straight segments between consecutive control points, closed back to the
/// first point and parameterized over `[0, 1)`.
#[derive(Debug, Clone)]
pub struct PolylineLoop {
    points: ControlPoints,
}

impl PolylineLoop {
    pub fn new(points: ControlPoints) -> Self {
        Self { points }
    }

    fn segment(&self, t: f64) -> (Point3, Point3, f64) {
        let (seg, local) = self.points.locate(wrap_unit(t));
        let i = seg as isize;
        (self.points.wrapped(i), self.points.wrapped(i + 1), local)
    }
}

impl Curve for PolylineLoop {
    fn point_at(&self, t: f64) -> Point3 {
        let (p0, p1, local) = self.segment(t);
        p0.lerp(p1, local)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        // dP/dt = n * (p1 - p0); at a vertex the outgoing segment wins
        let (p0, p1, _) = self.segment(t);
        (p1 - p0) * self.points.len() as f64
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaster_core::Tolerance;
    use coaster_math::DVec3;

    fn triangle() -> PolylineLoop {
        let pts = ControlPoints::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(3.0, 0.0, 0.0),
                DVec3::new(0.0, 0.0, 3.0),
            ],
            3,
            Tolerance::default(),
        )
        .unwrap();
        PolylineLoop::new(pts)
    }

    #[test]
    fn test_polyline_hits_vertices() {
        let curve = triangle();
        assert!((curve.point_at(0.0) - DVec3::ZERO).length() < 1e-12);
        assert!((curve.point_at(1.0 / 3.0) - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-9);
        assert!((curve.point_at(1.0) - DVec3::ZERO).length() < 1e-12);
    }

    #[test]
    fn test_polyline_midpoint() {
        let curve = triangle();
        let p = curve.point_at(1.0 / 6.0);
        assert!((p - DVec3::new(1.5, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_polyline_tangent_is_scaled_chord() {
        let curve = triangle();
        let d = curve.tangent_at(0.1);
        assert!((d - DVec3::new(9.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_polyline_wraps_negative_parameters() {
        let curve = triangle();
        let a = curve.point_at(-0.1);
        let b = curve.point_at(0.9);
        assert!((a - b).length() < 1e-9);
    }
}
