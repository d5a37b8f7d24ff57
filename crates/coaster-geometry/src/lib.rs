//! Coaster geometry: closed track curves, frames, and sampling.

pub mod control_points;
pub mod curve;
pub mod evaluator;
pub mod frame;
pub mod tessellate;

pub use control_points::ControlPoints;
pub use curve::{CatmullRomLoop, Curve, InterpolationPolicy, PolylineLoop};
pub use evaluator::CurveEvaluator;
pub use frame::Frame;
