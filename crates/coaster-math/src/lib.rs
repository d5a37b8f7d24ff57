pub mod aabb;
pub mod transform;

pub use glam::{DMat3, DMat4, DQuat, DVec2, DVec3, DVec4};
pub use aabb::Aabb3;
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;

/// Wrap a value into `[0, 1)`, also for negative inputs.
///
/// `rem_euclid` can round up to exactly `1.0` for tiny negative values, which
/// is folded back to `0.0`.
pub fn wrap_unit(t: f64) -> f64 {
    let w = t.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Shortest signed difference `b - a` on the unit circle, in `[-0.5, 0.5)`.
pub fn unit_delta(a: f64, b: f64) -> f64 {
    wrap_unit(b - a + 0.5) - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_unit() {
        assert_abs_diff_eq!(wrap_unit(0.25), 0.25);
        assert_abs_diff_eq!(wrap_unit(1.25), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_unit(-0.25), 0.75, epsilon = 1e-12);
        assert_eq!(wrap_unit(1.0), 0.0);
        let tiny = wrap_unit(-1e-18);
        assert!((0.0..1.0).contains(&tiny));
    }

    #[test]
    fn test_unit_delta_across_seam() {
        assert_abs_diff_eq!(unit_delta(0.99, 0.01), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(unit_delta(0.01, 0.99), -0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(unit_delta(0.2, 0.3), 0.1, epsilon = 1e-12);
    }
}
