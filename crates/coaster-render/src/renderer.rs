//! Frame-driven drawing of a track and the train riding it.

use std::path::Path;

use coaster_core::{CoasterError, Result, Tolerance, Validate};
use coaster_geometry::Frame;
use coaster_math::{Transform, Vector3};
use coaster_mesh::{cuboid, rod, track_mesh, TrackStyle, TriangleMesh};
use coaster_track::{Train, Track};
use serde::{Deserialize, Serialize};

use crate::pipeline::{prepare_mesh, RenderMesh};
use crate::scene::Scene;

const TRACK_COLOR: [f32; 3] = [0.75, 0.2, 0.15];
const CAR_COLOR: [f32; 3] = [0.95, 0.8, 0.1];
const ROD_COLOR: [f32; 3] = [0.3, 0.3, 0.3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Rings swept along the track.
    pub track_samples: usize,
    /// Sweep the track with banked frames.
    pub banked_track: bool,
    pub style: TrackStyle,
    pub car_half_extents: [f64; 3],
    pub rod_radius: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            track_samples: 400,
            banked_track: false,
            style: TrackStyle::default(),
            car_half_extents: [0.6, 0.4, 1.0],
            rod_radius: 0.05,
        }
    }
}

impl Validate for RendererConfig {
    fn validate(&self) -> Result<()> {
        if self.track_samples < 3 {
            return Err(CoasterError::configuration(format!(
                "track_samples must be at least 3, got {}",
                self.track_samples
            )));
        }
        let sizes = [
            self.style.rail_radius,
            self.style.spine_radius,
            self.rod_radius,
            self.car_half_extents[0],
            self.car_half_extents[1],
            self.car_half_extents[2],
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(CoasterError::configuration("mesh sizes must be finite and positive"));
        }
        Ok(())
    }
}

/// Instance transforms for one frame, column-major.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub frame: u64,
    pub cars: Vec<[f32; 16]>,
    pub rods: Vec<[f32; 16]>,
}

struct Prepared {
    track: TriangleMesh,
    track_gpu: RenderMesh,
    frames_drawn: u64,
    last: Option<DrawList>,
}

enum State {
    Uninitialized,
    Ready(Box<Prepared>),
    Disposed,
}

/// Owns every mesh the scene needs; created once and driven per frame.
///
/// `init` sweeps the static track, `draw` places the cars and rods for the
/// current train pose and `dispose` releases the meshes. Drawing outside
/// `init`..`dispose` is an [`CoasterError::InvalidOperation`].
pub struct SceneRenderer {
    config: RendererConfig,
    car: TriangleMesh,
    rod: TriangleMesh,
    state: State,
}

impl SceneRenderer {
    pub fn new(config: RendererConfig) -> Result<Self> {
        config.validate()?;
        let car = cuboid(Vector3::from_array(config.car_half_extents));
        let rod = rod(config.rod_radius, config.style.sides);
        Ok(Self {
            config,
            car,
            rod,
            state: State::Uninitialized,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// Build the static track geometry. Calling it again rebuilds for a new track.
    pub fn init(&mut self, track: &Track) -> Result<()> {
        let frames = track.frames(self.config.track_samples, self.config.banked_track)?;
        let mesh = track_mesh(&frames, &self.config.style);
        mesh.check()?;
        let track_gpu = prepare_mesh(&mesh);
        log::debug!(
            "track mesh ready: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.state = State::Ready(Box::new(Prepared {
            track: mesh,
            track_gpu,
            frames_drawn: 0,
            last: None,
        }));
        Ok(())
    }

    /// Place the cars and the rods coupling neighbouring cars.
    pub fn draw(&mut self, train: &Train) -> Result<&DrawList> {
        let prepared = self.prepared_mut("draw")?;

        let cars: Vec<[f32; 16]> = train.cars().iter().map(|c| c.transform().to_cols_f32()).collect();
        let rods = train
            .cars()
            .windows(2)
            .filter_map(|pair| rod_transform(pair[0].position(), pair[1].position(), pair[0].normal()))
            .map(|t| t.to_cols_f32())
            .collect();

        let list = DrawList {
            frame: prepared.frames_drawn,
            cars,
            rods,
        };
        prepared.frames_drawn += 1;
        log::trace!("frame {}: {} cars, {} rods", list.frame, list.cars.len(), list.rods.len());
        Ok(prepared.last.insert(list))
    }

    /// Release the meshes. Any later `draw` fails until `init` runs again.
    pub fn dispose(&mut self) {
        if let State::Ready(prepared) = &self.state {
            log::debug!("renderer disposed after {} frames", prepared.frames_drawn);
        }
        self.state = State::Disposed;
    }

    pub fn frames_drawn(&self) -> u64 {
        match &self.state {
            State::Ready(p) => p.frames_drawn,
            _ => 0,
        }
    }

    /// GPU buffers of the swept track.
    pub fn track_buffers(&self) -> Result<&RenderMesh> {
        Ok(&self.prepared("track_buffers")?.track_gpu)
    }

    /// Scene holding the track and the most recent draw list.
    pub fn snapshot(&self) -> Result<Scene> {
        let prepared = self.prepared("snapshot")?;
        let last = prepared.last.clone().unwrap_or_default();
        let mut scene = Scene::new(format!("Coaster (frame {})", last.frame));
        scene.add_mesh("track", prepared.track.clone(), TRACK_COLOR);
        scene.add_instanced_group("cars", self.car.clone(), CAR_COLOR, last.cars);
        scene.add_instanced_group("rods", self.rod.clone(), ROD_COLOR, last.rods);
        Ok(scene)
    }

    pub fn export_html(&self, path: &Path) -> Result<()> {
        self.snapshot()?.export_html(path)?;
        log::info!("snapshot written to {}", path.display());
        Ok(())
    }

    fn prepared(&self, op: &str) -> Result<&Prepared> {
        match &self.state {
            State::Ready(p) => Ok(p),
            State::Uninitialized => Err(lifecycle_error(op, "before init")),
            State::Disposed => Err(lifecycle_error(op, "after dispose")),
        }
    }

    fn prepared_mut(&mut self, op: &str) -> Result<&mut Prepared> {
        match &mut self.state {
            State::Ready(p) => Ok(p),
            State::Uninitialized => Err(lifecycle_error(op, "before init")),
            State::Disposed => Err(lifecycle_error(op, "after dispose")),
        }
    }
}

fn lifecycle_error(op: &str, when: &str) -> CoasterError {
    CoasterError::InvalidOperation(format!("{op} called {when}"))
}

/// Unit rod transform spanning `from`..`to`; `None` when the ends coincide.
fn rod_transform(from: coaster_math::Point3, to: coaster_math::Point3, up: Vector3) -> Option<Transform> {
    let span = to - from;
    let frame = Frame::from_tangent(from, span, up, Tolerance::default())?;
    Some(Transform::from_pose(from, frame.tangent, frame.normal).with_length(span.length()))
}
