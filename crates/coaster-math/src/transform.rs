use crate::{DMat4, DVec4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Affine placement: a rotation and translation, optionally stretched along
/// local `+Z` by [`with_length`](Transform::with_length).
///
/// Model space for bodies riding the track: `+Z` points along the direction
/// of travel, `+Y` along the track normal and `+X = Y × Z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    /// Place a body at `origin`, facing `forward` with `up` as its roof.
    ///
    /// `forward` and `up` are expected to be orthonormal, as produced by a
    /// track frame.
    pub fn from_pose(origin: Point3, forward: Vector3, up: Vector3) -> Self {
        let side = up.cross(forward);
        Self::from_mat4(DMat4::from_cols(
            side.extend(0.0),
            up.extend(0.0),
            forward.extend(0.0),
            DVec4::new(origin.x, origin.y, origin.z, 1.0),
        ))
    }

    /// Stretch the local `+Z` axis by `length`, used for rods spanning two points.
    pub fn with_length(&self, length: f64) -> Self {
        Self::from_mat4(self.to_mat4() * DMat4::from_scale(Vector3::new(1.0, 1.0, length)))
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    /// Column-major `f32` matrix, the layout GPU instance buffers take.
    pub fn to_cols_f32(&self) -> [f32; 16] {
        self.matrix.map(|v| v as f32)
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_mat4().transform_vector3(v)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
