//! Triangle meshes for the coaster scene.
//!
//! The track is swept once from its frames; car bodies and connecting rods
//! are unit primitives placed each frame by a transform.

pub mod primitives;
pub mod triangulate;
pub mod tube;

pub use primitives::{cuboid, rod};
pub use triangulate::TriangleMesh;
pub use tube::{sweep_closed_tube, track_mesh, TrackStyle};
