//! Drawing side of the coaster: an explicitly owned [`SceneRenderer`] that
//! turns a track and a train into GPU-ready buffers and per-frame draw lists.

pub mod pipeline;
pub mod renderer;
pub mod scene;

pub use pipeline::{prepare_mesh, GpuVertex, RenderMesh};
pub use renderer::{DrawList, RendererConfig, SceneRenderer};
pub use scene::{InstancedGroup, Scene, SceneMesh};
