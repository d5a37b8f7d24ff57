//! Unit meshes placed per frame by a car or rod transform.
//!
//! Model space follows `Transform::from_pose`: +Z forward, +Y up, +X to the side.

use std::f64::consts::TAU;

use coaster_math::{Point2, Point3, Vector3};

use crate::TriangleMesh;

/// Axis-aligned box centered on the origin, flat shaded.
pub fn cuboid(half_extents: Vector3) -> TriangleMesh {
    // (normal, u, v) with u × v == normal
    let faces = [
        (Vector3::X, Vector3::Y, Vector3::Z),
        (Vector3::NEG_X, Vector3::Z, Vector3::Y),
        (Vector3::Y, Vector3::Z, Vector3::X),
        (Vector3::NEG_Y, Vector3::X, Vector3::Z),
        (Vector3::Z, Vector3::X, Vector3::Y),
        (Vector3::NEG_Z, Vector3::Y, Vector3::X),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut mesh = TriangleMesh::default();
    for (normal, u, v) in faces {
        let base = mesh.positions.len() as u32;
        for (su, sv) in corners {
            let p = (normal + u * su + v * sv) * half_extents;
            mesh.positions.push(p);
            mesh.normals.push(normal);
            mesh.uvs.push(Point2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Capped cylinder of unit length running from the origin along +Z.
///
/// Scale the local Z axis (see `Transform::with_length`) to span two points.
pub fn rod(radius: f64, sides: usize) -> TriangleMesh {
    let sides = sides.max(3);
    let mut mesh = TriangleMesh::default();

    let ring = |j: usize| -> Vector3 {
        let theta = TAU * j as f64 / sides as f64;
        Vector3::new(theta.cos(), theta.sin(), 0.0)
    };

    // side wall
    for z in [0.0, 1.0] {
        for j in 0..sides {
            let radial = ring(j);
            mesh.positions.push(radial * radius + Vector3::new(0.0, 0.0, z));
            mesh.normals.push(radial);
            mesh.uvs.push(Point2::new(j as f64 / sides as f64, z));
        }
    }
    for j in 0..sides {
        let jn = ((j + 1) % sides) as u32;
        let j = j as u32;
        let s = sides as u32;
        mesh.indices.extend_from_slice(&[j, jn, s + jn, j, s + jn, s + j]);
    }

    // end caps as triangle fans around their centers
    for (z, normal) in [(0.0, Vector3::NEG_Z), (1.0, Vector3::Z)] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Point3::new(0.0, 0.0, z));
        mesh.normals.push(normal);
        mesh.uvs.push(Point2::new(0.5, 0.5));
        for j in 0..sides {
            let radial = ring(j);
            mesh.positions.push(radial * radius + Vector3::new(0.0, 0.0, z));
            mesh.normals.push(normal);
            mesh.uvs.push(Point2::new(0.5 + radial.x * 0.5, 0.5 + radial.y * 0.5));
        }
        for j in 0..sides as u32 {
            let a = center + 1 + j;
            let b = center + 1 + (j + 1) % sides as u32;
            if z > 0.5 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
    mesh
}
