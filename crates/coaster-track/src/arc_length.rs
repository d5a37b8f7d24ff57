//! Cumulative arc-length table for reparameterizing a closed curve.

use coaster_geometry::tessellate::{cumulative_lengths, sample_curve};
use coaster_geometry::Curve;
use coaster_math::wrap_unit;

/// Curve parameters and the distance travelled to reach each of them.
///
/// Built from `samples + 1` uniform parameters over `[0, 1]`, so the first
/// entry is `(0, 0)` and the last is `(1, length)`.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    params: Vec<f64>,
    lengths: Vec<f64>,
}

impl ArcLengthTable {
    pub fn build(curve: &dyn Curve, samples: usize) -> Self {
        let samples = samples.max(1);
        let points = sample_curve(curve, samples);
        let lengths = cumulative_lengths(&points);
        let params = (0..=samples).map(|i| i as f64 / samples as f64).collect();
        Self { params, lengths }
    }

    /// Polyline length of the sampled loop.
    pub fn total(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn samples(&self) -> usize {
        self.params.len() - 1
    }

    /// Curve parameter reached after travelling `fraction` of the loop.
    pub fn curve_parameter(&self, fraction: f64) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            return wrap_unit(fraction);
        }
        let target = wrap_unit(fraction) * total;
        let last = self.lengths.len() - 2;
        let k = self
            .lengths
            .partition_point(|&s| s <= target)
            .saturating_sub(1)
            .min(last);
        let (s0, s1) = (self.lengths[k], self.lengths[k + 1]);
        let (u0, u1) = (self.params[k], self.params[k + 1]);
        let span = s1 - s0;
        if span <= 0.0 {
            return u0;
        }
        u0 + (u1 - u0) * ((target - s0) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use coaster_core::Tolerance;
    use coaster_geometry::{ControlPoints, PolylineLoop};
    use coaster_math::DVec3;

    /// A 3-4-5 triangle: uneven segment lengths under a uniform parameter.
    fn triangle() -> PolylineLoop {
        let pts = ControlPoints::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(3.0, 0.0, 0.0),
                DVec3::new(3.0, 0.0, 4.0),
            ],
            3,
            Tolerance::default(),
        )
        .unwrap();
        PolylineLoop::new(pts)
    }

    #[test]
    fn test_total_is_perimeter() {
        let table = ArcLengthTable::build(&triangle(), 300);
        assert_abs_diff_eq!(table.total(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_endpoints_fixed() {
        let table = ArcLengthTable::build(&triangle(), 300);
        assert_eq!(table.curve_parameter(0.0), 0.0);
        // a full lap wraps back onto the seam
        assert_eq!(table.curve_parameter(1.0), 0.0);
    }

    #[test]
    fn test_equal_fractions_cover_equal_distance() {
        let curve = triangle();
        let table = ArcLengthTable::build(&curve, 300);
        // 3 of 12 units travelled: the first corner
        let u = table.curve_parameter(0.25);
        let p = curve.point_at(u);
        assert!((p - DVec3::new(3.0, 0.0, 0.0)).length() < 1e-9);
        // halfway along the 4-long side
        let u = table.curve_parameter(5.0 / 12.0);
        let p = curve.point_at(u);
        assert!((p - DVec3::new(3.0, 0.0, 2.0)).length() < 1e-9);
    }
}
