//! Orthonormal frames along a track.

use coaster_core::Tolerance;
use coaster_math::{DQuat, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Right-handed orthonormal frame at a point on a curve.
///
/// - `tangent`: direction of travel
/// - `normal`: the "up" side of the track cross-section
/// - `binormal`: `tangent × normal`, pointing to the right of travel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point3,
    pub tangent: Vector3,
    pub normal: Vector3,
    pub binormal: Vector3,
}

impl Frame {
    /// Build a frame from a (not necessarily unit) tangent and a world-up hint.
    ///
    /// `binormal = normalize(tangent × up)` and `normal = binormal × tangent`,
    /// so the normal is exactly orthogonal to the tangent whatever `up` is.
    /// When the tangent is within `tol.angular` of `up`, the world axis least
    /// aligned with the tangent stands in for `up`.
    ///
    /// Returns `None` for a zero-length tangent.
    pub fn from_tangent(origin: Point3, tangent: Vector3, up: Vector3, tol: Tolerance) -> Option<Self> {
        let tangent = tangent.try_normalize()?;
        let up = up.try_normalize().unwrap_or(Vector3::Y);

        let mut side = tangent.cross(up);
        if tol.is_parallel(side.length()) {
            side = tangent.cross(least_aligned_axis(tangent));
        }
        let binormal = side.try_normalize()?;
        let normal = binormal.cross(tangent).normalize();

        Some(Self {
            origin,
            tangent,
            normal,
            binormal,
        })
    }

    /// Roll the frame about its tangent by `angle` radians.
    ///
    /// Positive angles tilt the normal towards the binormal (to the right).
    pub fn rolled(&self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let q = DQuat::from_axis_angle(self.tangent, angle);
        let normal = (q * self.normal).normalize();
        Self {
            origin: self.origin,
            tangent: self.tangent,
            normal,
            binormal: self.tangent.cross(normal).normalize(),
        }
    }

    /// Point offset from the origin in the cross-section plane.
    pub fn offset(&self, right: f64, up: f64) -> Point3 {
        self.origin + self.binormal * right + self.normal * up
    }

    /// Largest deviation from orthonormality, used in checks and tests.
    pub fn orthonormality_error(&self) -> f64 {
        [
            (self.tangent.length() - 1.0).abs(),
            (self.normal.length() - 1.0).abs(),
            (self.binormal.length() - 1.0).abs(),
            self.tangent.dot(self.normal).abs(),
            self.tangent.dot(self.binormal).abs(),
            self.normal.dot(self.binormal).abs(),
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

/// World axis with the smallest component along `v`; ties resolve X, Z, Y.
fn least_aligned_axis(v: Vector3) -> Vector3 {
    let a = v.abs();
    if a.x <= a.z && a.x <= a.y {
        Vector3::X
    } else if a.z <= a.y {
        Vector3::Z
    } else {
        Vector3::Y
    }
}
