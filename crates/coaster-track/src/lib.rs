//! Track model and train kinematics.
//!
//! A [`Track`] turns a closed loop of control points into position, direction
//! and normal functions of a parameter in `[0, 1)`. A [`Train`] owns a fixed
//! set of [`Car`]s that ride it at a common speed and constant spacing.

pub mod arc_length;
pub mod car;
pub mod config;
pub mod control;
pub mod speed;
pub mod track;
pub mod train;

pub use arc_length::ArcLengthTable;
pub use car::Car;
pub use config::{CoasterConfig, StationZone, TrackConfig, TrainConfig};
pub use control::{status_line, TrainControl};
pub use speed::SpeedProfile;
pub use track::{Track, TrackPoints};
pub use train::Train;
