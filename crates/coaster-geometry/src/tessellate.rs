//! Uniform sampling of closed curves into discrete points.

use coaster_math::Point3;

use crate::curve::Curve;

/// `count` parameters evenly spread over `[0, 1)`; the seam is not repeated.
pub fn uniform_parameters(count: usize) -> impl Iterator<Item = f64> + Clone {
    (0..count).map(move |i| i as f64 / count as f64)
}

/// Sample a curve at `count + 1` uniform parameters over its full domain,
/// so a closed curve yields a polyline whose last point repeats the first.
pub fn sample_curve(curve: &dyn Curve, count: usize) -> Vec<Point3> {
    let (t_min, t_max) = curve.domain();
    let count = count.max(1);
    (0..=count)
        .map(|i| curve.point_at(t_min + (t_max - t_min) * i as f64 / count as f64))
        .collect()
}

/// Running length along a polyline, starting at `0.0`; one entry per point.
pub fn cumulative_lengths(points: &[Point3]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = Vec::with_capacity(points.len());
    if let Some(&first) = points.first() {
        out.push(0.0);
        let mut prev = first;
        for &p in &points[1..] {
            acc += p.distance(prev);
            out.push(acc);
            prev = p;
        }
    }
    out
}
