use coaster_core::{CoasterError, Result};
use coaster_math::aabb::Aabb3;
use coaster_math::{Point2, Point3, Transform, Vector3};

/// GPU-ready triangle mesh with interleaved vertex data.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Point2>,
}

impl TriangleMesh {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Merge another mesh into this one, offsetting indices appropriately.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Copy of the mesh with positions and normals moved by a rigid transform.
    pub fn transformed(&self, transform: &Transform) -> TriangleMesh {
        TriangleMesh {
            positions: self.positions.iter().map(|&p| transform.transform_point(p)).collect(),
            normals: self
                .normals
                .iter()
                .map(|&n| transform.transform_vector(n).normalize_or_zero())
                .collect(),
            indices: self.indices.clone(),
            uvs: self.uvs.clone(),
        }
    }

    /// Accumulate face normals onto shared vertices and normalize (smooth shading).
    pub fn compute_normals(&mut self) {
        let n = self.positions.len();
        self.normals.clear();
        self.normals.resize(n, Vector3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = self.positions[i0];
            let face = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            self.normals[i0] += face;
            self.normals[i1] += face;
            self.normals[i2] += face;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    /// Check that indices form whole triangles and stay in range, and that
    /// per-vertex attributes, when present, match the vertex count.
    pub fn check(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(CoasterError::InvalidOperation(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let n = self.positions.len() as u32;
        if let Some(&bad) = self.indices.iter().find(|&&i| i >= n) {
            return Err(CoasterError::InvalidOperation(format!(
                "index {bad} out of bounds for {n} vertices"
            )));
        }
        for (name, len) in [("normals", self.normals.len()), ("uvs", self.uvs.len())] {
            if len != 0 && len != self.positions.len() {
                return Err(CoasterError::InvalidOperation(format!(
                    "{name} has {len} entries for {} vertices",
                    self.positions.len()
                )));
            }
        }
        Ok(())
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(self.positions.iter().copied())
            .unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }
}
