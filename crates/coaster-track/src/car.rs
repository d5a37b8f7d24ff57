//! A single body riding the track.

use std::sync::Arc;

use coaster_core::{ensure_finite, CoasterError, Result, Validate};
use coaster_geometry::Frame;
use coaster_math::{wrap_unit, Point3, Transform, Vector3};

use crate::config::TrainConfig;
use crate::speed::SpeedProfile;
use crate::track::Track;

/// One car: its progress along the track and the pose derived from it.
///
/// The pose is recomputed whenever the parameter changes; getters only read
/// the cached values. [`position`](Self::position) already includes the ride
/// height offset along the normal, [`centerline`](Self::centerline) does not.
#[derive(Debug, Clone)]
pub struct Car {
    track: Arc<Track>,
    parameter: f64,
    speed: f64,
    max_speed: f64,
    ride_height: f64,
    banking: bool,
    profile: SpeedProfile,
    frame: Frame,
    position: Point3,
}

impl Car {
    pub fn new(track: Arc<Track>, parameter: f64, config: &TrainConfig) -> Result<Self> {
        config.validate()?;
        let parameter = wrap_unit(ensure_finite("initial parameter", parameter)?);
        let frame = Self::sample(&track, parameter, config.banking)?;
        let mut car = Self {
            track,
            parameter,
            speed: 0.0,
            max_speed: config.max_speed,
            ride_height: config.ride_height,
            banking: config.banking,
            profile: SpeedProfile::from_zone(config.station_zone),
            position: frame.origin + frame.normal * config.ride_height,
            frame,
        };
        car.set_speed(config.speed);
        Ok(car)
    }

    fn sample(track: &Track, parameter: f64, banking: bool) -> Result<Frame> {
        if banking {
            track.banked_frame(parameter)
        } else {
            track.frame(parameter)
        }
    }

    /// Speed after the profile's modifier at the current parameter.
    pub fn effective_speed(&self) -> f64 {
        self.speed * self.profile.factor(self.parameter)
    }

    /// Parameter change for `dt` seconds at the effective speed.
    pub fn parameter_step(&self, dt: f64) -> Result<f64> {
        let dt = ensure_finite("dt", dt)?;
        if dt < 0.0 {
            return Err(CoasterError::domain(format!("dt must be non-negative, got {dt}")));
        }
        Ok(self.effective_speed() * dt / self.track.length())
    }

    /// Move along the track for `dt` seconds and refresh the pose.
    ///
    /// On a non-finite or negative `dt` the car is left untouched.
    pub fn advance(&mut self, dt: f64) -> Result<()> {
        let delta = self.parameter_step(dt)?;
        self.step(delta)
    }

    /// Move by a parameter delta, wrapping into `[0, 1)`.
    pub(crate) fn step(&mut self, delta: f64) -> Result<()> {
        let parameter = wrap_unit(self.parameter + delta);
        let frame = Self::sample(&self.track, parameter, self.banking)?;
        self.parameter = parameter;
        self.frame = frame;
        self.position = frame.origin + frame.normal * self.ride_height;
        Ok(())
    }

    /// Clamp into `[0, max_speed]` and return the speed actually applied.
    ///
    /// NaN is treated as a request to stop.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let applied = if speed.is_nan() {
            0.0
        } else {
            speed.clamp(0.0, self.max_speed)
        };
        if applied != speed {
            log::warn!(
                "car speed {} outside [0, {}], using {}",
                speed,
                self.max_speed,
                applied
            );
        }
        self.speed = applied;
        applied
    }

    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Body position: the centerline lifted by the ride height along the normal.
    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn centerline(&self) -> Point3 {
        self.frame.origin
    }

    pub fn direction(&self) -> Vector3 {
        self.frame.tangent
    }

    pub fn normal(&self) -> Vector3 {
        self.frame.normal
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Model transform placing a car mesh at the current pose.
    pub fn transform(&self) -> Transform {
        Transform::from_pose(self.position, self.frame.tangent, self.frame.normal)
    }

    pub fn track(&self) -> &Track {
        &self.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StationZone, TrackConfig};
    use approx::assert_abs_diff_eq;
    use coaster_geometry::InterpolationPolicy;
    use coaster_math::DVec3;

    /// A square loop of side 10: length 40 under linear interpolation.
    fn square_track() -> Arc<Track> {
        let config = TrackConfig {
            interpolation: InterpolationPolicy::Linear,
            ..TrackConfig::with_points(&[
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(10.0, 0.0, 0.0),
                DVec3::new(10.0, 0.0, 10.0),
                DVec3::new(0.0, 0.0, 10.0),
            ])
        };
        Arc::new(Track::new(&config).unwrap())
    }

    fn car_config(speed: f64) -> TrainConfig {
        TrainConfig {
            speed,
            ride_height: 0.0,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_advance_uses_track_length() {
        let track = square_track();
        assert_abs_diff_eq!(track.length(), 40.0, epsilon = 1e-9);
        let mut car = Car::new(track, 0.0, &car_config(4.0)).unwrap();
        car.advance(1.0).unwrap();
        assert_abs_diff_eq!(car.parameter(), 0.1, epsilon = 1e-12);
        assert!((car.position() - DVec3::new(4.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_limits() {
        let bad_max = TrainConfig {
            max_speed: -1.0,
            ..TrainConfig::default()
        };
        let err = Car::new(square_track(), 0.0, &bad_max).unwrap_err();
        assert!(matches!(err, CoasterError::Configuration(_)));

        let bad_height = TrainConfig {
            ride_height: f64::NAN,
            ..TrainConfig::default()
        };
        let err = Car::new(square_track(), 0.0, &bad_height).unwrap_err();
        assert!(matches!(err, CoasterError::Configuration(_)));
    }

    #[test]
    fn test_parameter_wraps() {
        let mut car = Car::new(square_track(), 0.95, &car_config(4.0)).unwrap();
        car.advance(1.0).unwrap();
        assert!((0.0..1.0).contains(&car.parameter()));
        assert_abs_diff_eq!(car.parameter(), 0.05, epsilon = 1e-9);

        // several laps in one step still land inside the loop
        car.advance(35.0).unwrap();
        assert!((0.0..1.0).contains(&car.parameter()));
        assert_abs_diff_eq!(car.parameter(), 0.55, epsilon = 1e-9);
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut car = Car::new(square_track(), 0.0, &car_config(4.0)).unwrap();
        assert_eq!(car.set_speed(-3.0), 0.0);
        assert_eq!(car.speed(), 0.0);
        assert_eq!(car.set_speed(500.0), car.max_speed());
        assert_eq!(car.set_speed(f64::NAN), 0.0);
        assert_eq!(car.set_speed(f64::INFINITY), car.max_speed());
        assert_eq!(car.set_speed(7.5), 7.5);
    }

    #[test]
    fn test_initial_speed_is_clamped() {
        let car = Car::new(square_track(), 0.0, &car_config(99.0)).unwrap();
        assert_eq!(car.speed(), 20.0);
    }

    #[test]
    fn test_bad_dt_leaves_car_untouched() {
        let mut car = Car::new(square_track(), 0.3, &car_config(4.0)).unwrap();
        let before = car.position();
        assert!(matches!(car.advance(f64::NAN), Err(CoasterError::Domain(_))));
        assert!(matches!(car.advance(-0.1), Err(CoasterError::Domain(_))));
        assert_eq!(car.parameter(), 0.3);
        assert_eq!(car.position(), before);
    }

    #[test]
    fn test_ride_height_offsets_along_normal() {
        let config = TrainConfig {
            ride_height: 0.1,
            ..car_config(4.0)
        };
        let car = Car::new(square_track(), 0.125, &config).unwrap();
        let lift = car.position() - car.centerline();
        assert_abs_diff_eq!(lift.length(), 0.1, epsilon = 1e-12);
        assert!(lift.normalize().dot(car.normal()) > 1.0 - 1e-12);
        assert_abs_diff_eq!(car.normal().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_station_zone_slows_car() {
        let config = TrainConfig {
            station_zone: Some(StationZone::default()),
            ..car_config(4.0)
        };
        let mut car = Car::new(square_track(), 0.0, &config).unwrap();
        assert_eq!(car.effective_speed(), 2.0);
        car.advance(1.0).unwrap();
        assert_abs_diff_eq!(car.parameter(), 0.05, epsilon = 1e-12);

        let mut car = Car::new(square_track(), 0.5, &config).unwrap();
        car.advance(1.0).unwrap();
        assert_abs_diff_eq!(car.parameter(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_faces_direction() {
        let car = Car::new(square_track(), 0.125, &car_config(4.0)).unwrap();
        let t = car.transform();
        let fwd = t.transform_vector(DVec3::Z);
        assert!((fwd - car.direction()).length() < 1e-12);
        assert!((t.transform_point(DVec3::ZERO) - car.position()).length() < 1e-12);
    }
}
