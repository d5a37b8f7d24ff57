//! Position and frame sampling over a closed control-point loop.

use coaster_core::{ensure_finite, CoasterError, Result, Tolerance};
use coaster_math::{wrap_unit, Point3, Vector3};

use crate::control_points::ControlPoints;
use crate::curve::{Curve, InterpolationPolicy};
use crate::frame::Frame;

/// Maps a normalized parameter `t` to points and frames on a closed curve.
///
/// Every sampler wraps `t` into `[0, 1)` first, so progression past the seam
/// and negative parameters both land on the loop. Position, direction and
/// normal all go through the same interpolation basis.
pub struct CurveEvaluator {
    policy: InterpolationPolicy,
    points: ControlPoints,
    curve: Box<dyn Curve>,
    world_up: Vector3,
    tolerance: Tolerance,
}

impl std::fmt::Debug for CurveEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveEvaluator")
            .field("policy", &self.policy)
            .field("control_points", &self.points.len())
            .field("world_up", &self.world_up)
            .finish()
    }
}

impl CurveEvaluator {
    pub fn new(
        points: Vec<Point3>,
        policy: InterpolationPolicy,
        world_up: Vector3,
        tolerance: Tolerance,
    ) -> Result<Self> {
        let world_up = world_up
            .try_normalize()
            .ok_or_else(|| CoasterError::configuration(format!("world up must be non-zero, got {world_up}")))?;
        let points = ControlPoints::new(points, policy.min_control_points(), tolerance)?;
        let curve = policy.build(points.clone());
        log::debug!(
            "curve evaluator: {:?} over {} control points",
            policy,
            points.len()
        );
        Ok(Self {
            policy,
            points,
            curve,
            world_up,
            tolerance,
        })
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn num_segments(&self) -> usize {
        self.points.len()
    }

    pub fn segment_length(&self) -> f64 {
        1.0 / self.points.len() as f64
    }

    pub fn world_up(&self) -> Vector3 {
        self.world_up
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn curve(&self) -> &dyn Curve {
        self.curve.as_ref()
    }

    pub fn position(&self, t: f64) -> Result<Point3> {
        let t = wrap_unit(ensure_finite("t", t)?);
        Ok(self.curve.point_at(t))
    }

    /// Unit tangent from the analytic derivative of the basis.
    pub fn direction(&self, t: f64) -> Result<Vector3> {
        let t = wrap_unit(ensure_finite("t", t)?);
        Ok(self.unit_tangent(t))
    }

    /// Unit normal, exactly orthogonal to [`direction`](Self::direction).
    pub fn normal(&self, t: f64) -> Result<Vector3> {
        Ok(self.frame(t)?.normal)
    }

    pub fn frame(&self, t: f64) -> Result<Frame> {
        let t = wrap_unit(ensure_finite("t", t)?);
        let origin = self.curve.point_at(t);
        let tangent = self.unit_tangent(t);
        // unit_tangent never returns zero for a validated loop
        Frame::from_tangent(origin, tangent, self.world_up, self.tolerance)
            .ok_or_else(|| CoasterError::domain(format!("degenerate tangent at t={t}")))
    }

    /// Cosmetic roll, in radians, from how fast the horizontal heading turns.
    ///
    /// The heading rate is taken per unit of arc length and multiplied by
    /// `gain`; the result is clamped to `±max_bank`. Left turns roll left
    /// (negative), right turns roll right. Near-vertical directions have no
    /// heading and yield zero.
    pub fn bank_angle(&self, t: f64, gain: f64, max_bank: f64) -> Result<f64> {
        let t = wrap_unit(ensure_finite("t", t)?);
        let gain = ensure_finite("gain", gain)?;
        let max_bank = ensure_finite("max_bank", max_bank)?.abs();
        let h = self.segment_length() * 0.05;
        let up = self.world_up;
        let horizontal = |v: Vector3| (v - up * v.dot(up)).try_normalize();

        let (Some(before), Some(after)) = (
            horizontal(self.unit_tangent(wrap_unit(t - h))),
            horizontal(self.unit_tangent(wrap_unit(t + h))),
        ) else {
            return Ok(0.0);
        };

        let turn = up.dot(before.cross(after)).atan2(before.dot(after));
        let arc = self.curve.point_at(wrap_unit(t + h)).distance(self.curve.point_at(wrap_unit(t - h)));
        if self.tolerance.is_zero(arc) {
            return Ok(0.0);
        }
        Ok((-gain * turn / arc).clamp(-max_bank, max_bank))
    }

    fn unit_tangent(&self, t: f64) -> Vector3 {
        if let Some(d) = self.curve.tangent_at(t).try_normalize() {
            return d;
        }
        // cusp in the basis: step off it symmetrically, then fall back to the chord
        let h = self.segment_length() * 1e-3;
        let central = self.curve.point_at(wrap_unit(t + h)) - self.curve.point_at(wrap_unit(t - h));
        if let Some(d) = central.try_normalize() {
            return d;
        }
        let (seg, _) = self.points.locate(t);
        let i = seg as isize;
        (self.points.wrapped(i + 1) - self.points.wrapped(i)).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use coaster_math::DVec3;

    fn spec_points() -> Vec<Point3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 5.0, 0.0),
            DVec3::new(0.0, 10.0, 10.0),
            DVec3::new(-10.0, 5.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ]
    }

    fn evaluator(policy: InterpolationPolicy) -> CurveEvaluator {
        CurveEvaluator::new(spec_points(), policy, DVec3::Y, Tolerance::default()).unwrap()
    }

    fn sample_ts() -> impl Iterator<Item = f64> {
        (0..500).map(|i| i as f64 / 500.0 + 1e-4)
    }

    #[test]
    fn test_periodic() {
        for policy in [InterpolationPolicy::Linear, InterpolationPolicy::CatmullRom] {
            let e = evaluator(policy);
            let p0 = e.position(0.0).unwrap();
            let p1 = e.position(1.0).unwrap();
            assert!((p0 - p1).length() < 1e-4);
            let a = e.position(0.3).unwrap();
            let b = e.position(2.3).unwrap();
            assert!((a - b).length() < 1e-9);
        }
    }

    #[test]
    fn test_unit_direction_and_normal() {
        for policy in [InterpolationPolicy::Linear, InterpolationPolicy::CatmullRom] {
            let e = evaluator(policy);
            for t in sample_ts() {
                let d = e.direction(t).unwrap();
                let n = e.normal(t).unwrap();
                assert_abs_diff_eq!(d.length(), 1.0, epsilon = 1e-9);
                assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-9);
                assert!(d.dot(n).abs() < 1e-3, "not orthogonal at t={}", t);
            }
        }
    }

    #[test]
    fn test_wraparound_continuity() {
        let e = evaluator(InterpolationPolicy::CatmullRom);
        let a = e.position(0.999).unwrap();
        let b = e.position(0.001).unwrap();
        let speed = e.curve().tangent_at(0.0).length();
        assert!((a - b).length() < speed * 0.002 * 1.5);
    }

    #[test]
    fn test_catmull_rom_direction_continuous_at_seam() {
        let e = evaluator(InterpolationPolicy::CatmullRom);
        let a = e.direction(0.9999).unwrap();
        let b = e.direction(0.0001).unwrap();
        assert!(a.dot(b) > 0.99);
    }

    #[test]
    fn test_non_finite_parameter_is_domain_error() {
        let e = evaluator(InterpolationPolicy::CatmullRom);
        assert!(matches!(e.position(f64::NAN), Err(CoasterError::Domain(_))));
        assert!(matches!(e.direction(f64::INFINITY), Err(CoasterError::Domain(_))));
        assert!(matches!(e.normal(f64::NEG_INFINITY), Err(CoasterError::Domain(_))));
    }

    #[test]
    fn test_too_few_points_for_catmull_rom() {
        let pts = vec![DVec3::ZERO, DVec3::X, DVec3::Z];
        let err = CurveEvaluator::new(pts.clone(), InterpolationPolicy::CatmullRom, DVec3::Y, Tolerance::default())
            .unwrap_err();
        assert!(matches!(err, CoasterError::Configuration(_)));
        // the same loop is fine with straight segments
        assert!(CurveEvaluator::new(pts, InterpolationPolicy::Linear, DVec3::Y, Tolerance::default()).is_ok());
    }

    #[test]
    fn test_zero_world_up_rejected() {
        let err = CurveEvaluator::new(spec_points(), InterpolationPolicy::Linear, DVec3::ZERO, Tolerance::default())
            .unwrap_err();
        assert!(matches!(err, CoasterError::Configuration(_)));
    }

    #[test]
    fn test_cusp_falls_back_to_finite_direction() {
        // a-b-a-d: the neighbours of b (and of d) coincide, so the basis
        // derivative vanishes at both of them
        let a = DVec3::new(0.0, 0.0, 0.0);
        let pts = vec![a, DVec3::new(10.0, 0.0, 0.0), a, DVec3::new(0.0, 0.0, 10.0)];
        let e = CurveEvaluator::new(pts, InterpolationPolicy::CatmullRom, DVec3::Y, Tolerance::default()).unwrap();
        for i in 0..=8 {
            let d = e.direction(i as f64 / 8.0).unwrap();
            assert!(d.is_finite());
            assert_abs_diff_eq!(d.length(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bank_angle_sign_and_clamp() {
        // counter-clockwise loop seen from above: every turn is to the left
        let pts: Vec<Point3> = (0..8)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 8.0;
                DVec3::new(20.0 * a.cos(), 0.0, -20.0 * a.sin())
            })
            .collect();
        let e = CurveEvaluator::new(pts, InterpolationPolicy::CatmullRom, DVec3::Y, Tolerance::default()).unwrap();
        let bank = e.bank_angle(0.3, 10.0, 0.6).unwrap();
        assert!(bank < 0.0, "left turn should roll left, got {}", bank);
        assert!(bank >= -0.6);
        let strong = e.bank_angle(0.3, 1e6, 0.6).unwrap();
        assert_abs_diff_eq!(strong, -0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_bank_angle_rejects_non_finite_limits() {
        let e = evaluator(InterpolationPolicy::CatmullRom);
        assert!(matches!(e.bank_angle(0.3, 1.0, f64::NAN), Err(CoasterError::Domain(_))));
        assert!(matches!(e.bank_angle(0.3, f64::INFINITY, 0.5), Err(CoasterError::Domain(_))));
        assert!(e.bank_angle(0.3, 1.0, 0.5).is_ok());
    }

    #[test]
    fn test_bank_angle_zero_on_straight_linear_segment() {
        let e = CurveEvaluator::new(
            vec![DVec3::ZERO, DVec3::new(30.0, 0.0, 0.0), DVec3::new(15.0, 0.0, 20.0)],
            InterpolationPolicy::Linear,
            DVec3::Y,
            Tolerance::default(),
        )
        .unwrap();
        let bank = e.bank_angle(1.0 / 6.0, 10.0, 1.0).unwrap();
        assert_abs_diff_eq!(bank, 0.0, epsilon = 1e-12);
    }
}
