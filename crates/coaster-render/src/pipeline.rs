use coaster_math::{Point2, Point3, Vector3};
use coaster_mesh::TriangleMesh;

/// Vertex with f32 data packed for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GpuVertex {
    /// Size of one packed vertex in bytes.
    pub const STRIDE: usize = std::mem::size_of::<GpuVertex>();

    /// Create a GPU vertex from mesh vertex data.
    pub fn from_mesh_vertex(pos: Point3, normal: Vector3, uv: Point2) -> Self {
        Self {
            position: pos.as_vec3().to_array(),
            normal: normal.as_vec3().to_array(),
            uv: uv.as_vec2().to_array(),
        }
    }

    /// Convert vertex array to raw bytes for GPU upload.
    pub fn as_bytes(vertices: &[GpuVertex]) -> Vec<u8> {
        bytemuck::cast_slice(vertices).to_vec()
    }
}

/// Prepared render data ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices: Vec<u32>,
    pub vertex_buffer_bytes: Vec<u8>,
    pub index_buffer_bytes: Vec<u8>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Convert a TriangleMesh to GPU-ready buffers.
///
/// Missing normals default to +Y and missing UVs to zero.
pub fn prepare_mesh(mesh: &TriangleMesh) -> RenderMesh {
    let vertices: Vec<GpuVertex> = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            let normal = mesh.normals.get(i).copied().unwrap_or(Vector3::Y);
            let uv = mesh.uvs.get(i).copied().unwrap_or(Point2::ZERO);
            GpuVertex::from_mesh_vertex(pos, normal, uv)
        })
        .collect();

    let vertex_buffer_bytes = GpuVertex::as_bytes(&vertices);
    let index_buffer_bytes = bytemuck::cast_slice(&mesh.indices[..]).to_vec();

    RenderMesh {
        vertices,
        indices: mesh.indices.clone(),
        vertex_buffer_bytes,
        index_buffer_bytes,
    }
}
