//! Narrow control surface for input and overlay layers.

use coaster_math::Point3;

use crate::train::Train;

/// What a speed slider or status overlay may see and change on a train.
pub trait TrainControl {
    fn speed(&self) -> f64;

    /// Request a speed; returns the value actually applied.
    fn set_speed(&mut self, speed: f64) -> f64;

    fn position(&self) -> Point3;

    fn track_parameter(&self) -> f64;
}

impl TrainControl for Train {
    fn speed(&self) -> f64 {
        Train::speed(self)
    }

    fn set_speed(&mut self, speed: f64) -> f64 {
        Train::set_speed(self, speed)
    }

    fn position(&self) -> Point3 {
        Train::position(self)
    }

    fn track_parameter(&self) -> f64 {
        Train::track_parameter(self)
    }
}

/// One-line summary for a HUD or log.
pub fn status_line(train: &dyn TrainControl) -> String {
    let p = train.position();
    format!(
        "speed {:>5.2} | progress {:>5.1}% | pos ({:.2}, {:.2}, {:.2})",
        train.speed(),
        train.track_parameter() * 100.0,
        p.x,
        p.y,
        p.z
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TrackConfig, TrainConfig};
    use crate::track::Track;
    use std::sync::Arc;

    fn nudge(control: &mut dyn TrainControl, by: f64) -> f64 {
        let current = control.speed();
        control.set_speed(current + by)
    }

    #[test]
    fn test_control_through_trait_object() {
        let track = Arc::new(Track::new(&TrackConfig::default()).unwrap());
        let mut train = Train::new(track, &TrainConfig::default()).unwrap();
        assert_eq!(nudge(&mut train, 2.5), 7.5);
        assert_eq!(nudge(&mut train, 100.0), 20.0);
        assert_eq!(TrainControl::track_parameter(&train), 0.0);
    }

    #[test]
    fn test_status_line() {
        let track = Arc::new(Track::new(&TrackConfig::default()).unwrap());
        let train = Train::new(track, &TrainConfig::default()).unwrap();
        let line = status_line(&train);
        assert!(line.starts_with("speed  5.00"));
        assert!(line.contains("progress   0.0%"));
    }
}
