//! Tubes swept along closed sequences of track frames.

use std::f64::consts::TAU;

use coaster_geometry::Frame;
use coaster_math::{Point2, Vector3};
use serde::{Deserialize, Serialize};

use crate::TriangleMesh;

/// Cross-section of the track: two rails and a spine underneath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackStyle {
    pub rail_radius: f64,
    /// Distance between the two rail centers.
    pub gauge: f64,
    pub spine_radius: f64,
    /// How far below the centerline the spine runs.
    pub spine_drop: f64,
    /// Vertices per tube ring.
    pub sides: usize,
}

impl Default for TrackStyle {
    fn default() -> Self {
        Self {
            rail_radius: 0.08,
            gauge: 1.0,
            spine_radius: 0.15,
            spine_drop: 0.2,
            sides: 8,
        }
    }
}

/// Sweep a circular tube through `frames`, closing the last ring onto the first.
///
/// Each ring is centered at `frame.offset(right, up)`. Vertex normals point
/// radially outwards and triangles wind counter-clockwise seen from outside.
pub fn sweep_closed_tube(frames: &[Frame], radius: f64, sides: usize, right: f64, up: f64) -> TriangleMesh {
    let rings = frames.len();
    let sides = sides.max(3);
    if rings < 2 {
        return TriangleMesh::default();
    }

    let mut mesh = TriangleMesh::default();
    mesh.positions.reserve(rings * sides);
    for (i, frame) in frames.iter().enumerate() {
        let center = frame.offset(right, up);
        for j in 0..sides {
            let theta = TAU * j as f64 / sides as f64;
            let radial: Vector3 = frame.binormal * theta.cos() + frame.normal * theta.sin();
            mesh.positions.push(center + radial * radius);
            mesh.normals.push(radial);
            mesh.uvs.push(Point2::new(i as f64 / rings as f64, j as f64 / sides as f64));
        }
    }

    let idx = |ring: usize, side: usize| -> u32 { (ring * sides + side) as u32 };
    mesh.indices.reserve(rings * sides * 6);
    for i in 0..rings {
        let next = (i + 1) % rings;
        for j in 0..sides {
            let jn = (j + 1) % sides;
            let (a, b, c, d) = (idx(i, j), idx(next, j), idx(next, jn), idx(i, jn));
            mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    mesh
}

/// Rails and spine of the whole loop as one mesh.
pub fn track_mesh(frames: &[Frame], style: &TrackStyle) -> TriangleMesh {
    let half = style.gauge * 0.5;
    let mut mesh = sweep_closed_tube(frames, style.rail_radius, style.sides, -half, 0.0);
    mesh.merge(&sweep_closed_tube(frames, style.rail_radius, style.sides, half, 0.0));
    mesh.merge(&sweep_closed_tube(
        frames,
        style.spine_radius,
        style.sides,
        0.0,
        -style.spine_drop,
    ));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaster_core::Tolerance;
    use coaster_math::DVec3;

    /// Frames around a horizontal circle of radius 10.
    fn ring_frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|i| {
                let a = TAU * i as f64 / count as f64;
                let origin = DVec3::new(10.0 * a.cos(), 0.0, 10.0 * a.sin());
                let tangent = DVec3::new(-a.sin(), 0.0, a.cos());
                Frame::from_tangent(origin, tangent, DVec3::Y, Tolerance::default()).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_tube_counts() {
        let mesh = sweep_closed_tube(&ring_frames(32), 0.5, 6, 0.0, 0.0);
        assert_eq!(mesh.vertex_count(), 32 * 6);
        assert_eq!(mesh.triangle_count(), 32 * 6 * 2);
        mesh.check().unwrap();
    }

    #[test]
    fn test_tube_vertices_at_radius() {
        let frames = ring_frames(16);
        let mesh = sweep_closed_tube(&frames, 0.5, 6, 0.0, 0.0);
        for (k, p) in mesh.positions.iter().enumerate() {
            let center = frames[k / 6].origin;
            assert!(((*p - center).length() - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tube_winds_outwards() {
        let mesh = sweep_closed_tube(&ring_frames(24), 0.5, 8, 0.0, 0.0);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let face = (b - a).cross(c - a);
            let radial = mesh.normals[tri[0] as usize];
            assert!(face.dot(radial) > 0.0, "triangle {:?} faces inwards", tri);
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(sweep_closed_tube(&ring_frames(1), 0.5, 6, 0.0, 0.0).vertex_count(), 0);
    }

    #[test]
    fn test_track_mesh_has_three_tubes() {
        let style = TrackStyle::default();
        let mesh = track_mesh(&ring_frames(20), &style);
        assert_eq!(mesh.vertex_count(), 3 * 20 * style.sides);
        mesh.check().unwrap();
        // the spine hangs below the rails
        let lowest = mesh.positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((lowest + style.spine_drop + style.spine_radius).abs() < 1e-9);
    }
}
