//! Serde configuration for the track and the train.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "train": { "num_cars": 5, "car_spacing": 0.03 } }
//! ```

use std::path::Path;

use coaster_core::traits::Validate;
use coaster_core::{CoasterError, Result};
use coaster_geometry::InterpolationPolicy;
use coaster_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Shape and sampling of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Closed loop of authored points; the last may repeat the first.
    pub control_points: Vec<[f64; 3]>,
    pub interpolation: InterpolationPolicy,
    /// Uniform samples used to estimate the track length and arc-length table.
    pub length_samples: usize,
    /// Samples yielded by `Track::track_points`.
    pub point_samples: usize,
    /// Map the track parameter through arc length so equal steps cover equal distance.
    pub arc_length_parameterization: bool,
    pub world_up: [f64; 3],
    /// Roll per unit of heading change per unit length.
    pub bank_gain: f64,
    pub max_bank_degrees: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            // station, first hill, loop crest, second hill, back to the station
            control_points: vec![
                [0.0, 0.0, 0.0],
                [10.0, 5.0, 0.0],
                [20.0, 10.0, 0.0],
                [30.0, 10.0, 0.0],
                [40.0, 5.0, 0.0],
                [50.0, 8.0, 0.0],
                [60.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
            ],
            // a spline through this flat profile overshoots the last corner
            // and turns vertical, so the stock layout keeps straight segments
            interpolation: InterpolationPolicy::Linear,
            length_samples: 200,
            point_samples: 200,
            arc_length_parameterization: true,
            world_up: [0.0, 1.0, 0.0],
            bank_gain: 4.0,
            max_bank_degrees: 30.0,
        }
    }
}

impl TrackConfig {
    /// Use the given points, splined, with every other setting at its default.
    pub fn with_points(points: &[Point3]) -> Self {
        Self {
            control_points: points.iter().map(|p| p.to_array()).collect(),
            interpolation: InterpolationPolicy::default(),
            ..Self::default()
        }
    }

    pub fn points(&self) -> Vec<Point3> {
        self.control_points.iter().map(|&p| Point3::from_array(p)).collect()
    }

    pub fn up(&self) -> Vector3 {
        Vector3::from_array(self.world_up)
    }
}

impl Validate for TrackConfig {
    fn validate(&self) -> Result<()> {
        let min = self.interpolation.min_control_points();
        if self.control_points.len() < min {
            return Err(CoasterError::configuration(format!(
                "{:?} track needs at least {} control points, got {}",
                self.interpolation,
                min,
                self.control_points.len()
            )));
        }
        if self.length_samples < 8 {
            return Err(CoasterError::configuration(format!(
                "length_samples must be at least 8, got {}",
                self.length_samples
            )));
        }
        if self.point_samples < 2 {
            return Err(CoasterError::configuration(format!(
                "point_samples must be at least 2, got {}",
                self.point_samples
            )));
        }
        if !self.bank_gain.is_finite() {
            return Err(CoasterError::configuration("bank_gain must be finite"));
        }
        if !(0.0..90.0).contains(&self.max_bank_degrees) {
            return Err(CoasterError::configuration(format!(
                "max_bank_degrees must lie in [0, 90), got {}",
                self.max_bank_degrees
            )));
        }
        Ok(())
    }
}

/// Slow-down band around the seam of the loop, where the station sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationZone {
    /// Parameter distance from the seam covered by the zone, on each side.
    pub width: f64,
    /// Speed multiplier applied inside the zone.
    pub factor: f64,
}

impl Default for StationZone {
    fn default() -> Self {
        Self {
            width: 0.1,
            factor: 0.5,
        }
    }
}

impl Validate for StationZone {
    fn validate(&self) -> Result<()> {
        if !(0.0..=0.5).contains(&self.width) {
            return Err(CoasterError::configuration(format!(
                "station zone width must lie in [0, 0.5], got {}",
                self.width
            )));
        }
        // a zero factor would park the train in the station forever
        if !(self.factor > 0.0 && self.factor <= 1.0) {
            return Err(CoasterError::configuration(format!(
                "station zone factor must lie in (0, 1], got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

/// Number, spacing and motion limits of the cars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub num_cars: usize,
    /// Parameter offset between consecutive cars, a fraction of the track length.
    pub car_spacing: f64,
    /// Initial commanded speed in track units per second.
    pub speed: f64,
    pub max_speed: f64,
    /// Offset of the car body along the track normal.
    pub ride_height: f64,
    pub station_zone: Option<StationZone>,
    /// Orient cars with the banked normal instead of the plain track normal.
    pub banking: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_cars: 3,
            car_spacing: 0.02,
            speed: 5.0,
            max_speed: 20.0,
            ride_height: 0.1,
            station_zone: None,
            banking: false,
        }
    }
}

impl Validate for TrainConfig {
    fn validate(&self) -> Result<()> {
        if self.num_cars < 1 {
            return Err(CoasterError::configuration("a train needs at least one car"));
        }
        if !(self.car_spacing.is_finite() && self.car_spacing > 0.0 && self.car_spacing < 1.0) {
            return Err(CoasterError::configuration(format!(
                "car_spacing must lie in (0, 1), got {}",
                self.car_spacing
            )));
        }
        if self.num_cars as f64 * self.car_spacing > 1.0 + 1e-9 {
            return Err(CoasterError::configuration(format!(
                "{} cars spaced {} apart overlap around the loop",
                self.num_cars, self.car_spacing
            )));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(CoasterError::configuration(format!(
                "max_speed must be finite and non-negative, got {}",
                self.max_speed
            )));
        }
        if !self.speed.is_finite() {
            return Err(CoasterError::configuration("speed must be finite"));
        }
        if !self.ride_height.is_finite() {
            return Err(CoasterError::configuration("ride_height must be finite"));
        }
        if let Some(zone) = &self.station_zone {
            zone.validate()?;
        }
        Ok(())
    }
}

/// Complete scene configuration as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoasterConfig {
    pub track: TrackConfig,
    pub train: TrainConfig,
}

impl CoasterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CoasterError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded coaster config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoasterError::Parse(e.to_string()))
    }
}

impl Validate for CoasterConfig {
    fn validate(&self) -> Result<()> {
        self.track.validate()?;
        self.train.validate()
    }
}
