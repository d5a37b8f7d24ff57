//! A fixed set of cars advanced together with constant spacing.

use std::sync::Arc;

use coaster_core::traits::Validate;
use coaster_core::Result;
use coaster_math::{unit_delta, wrap_unit, Point3, Vector3};

use crate::car::Car;
use crate::config::TrainConfig;
use crate::track::Track;

/// Ordered cars sharing one track; car 0 is the lead car.
///
/// Car `i` starts at parameter `i * spacing` and every update moves all cars
/// by the same parameter delta, so the spacing never drifts.
#[derive(Debug, Clone)]
pub struct Train {
    cars: Vec<Car>,
    spacing: f64,
}

impl Train {
    pub fn new(track: Arc<Track>, config: &TrainConfig) -> Result<Self> {
        config.validate()?;
        let cars = (0..config.num_cars)
            .map(|i| Car::new(Arc::clone(&track), wrap_unit(i as f64 * config.car_spacing), config))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "train built: {} cars, spacing {}, speed {}",
            cars.len(),
            config.car_spacing,
            config.speed
        );
        Ok(Self {
            cars,
            spacing: config.car_spacing,
        })
    }

    /// Advance every car by `dt` seconds, in index order.
    ///
    /// The lead car's effective speed sets the parameter delta for the whole
    /// train. A non-finite or negative `dt` is rejected before any car moves.
    pub fn update(&mut self, dt: f64) -> Result<()> {
        let delta = self.lead().parameter_step(dt)?;
        for car in &mut self.cars {
            car.step(delta)?;
        }
        log::trace!(
            "train update dt={:.4} delta={:.6} lead t={:.5}",
            dt,
            delta,
            self.track_parameter()
        );
        Ok(())
    }

    /// Command the same speed on every car; returns the clamped value.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let mut applied = 0.0;
        for car in &mut self.cars {
            applied = car.set_speed(speed);
        }
        applied
    }

    pub fn lead(&self) -> &Car {
        &self.cars[0]
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn position(&self) -> Point3 {
        self.lead().position()
    }

    pub fn direction(&self) -> Vector3 {
        self.lead().direction()
    }

    pub fn normal(&self) -> Vector3 {
        self.lead().normal()
    }

    pub fn track_parameter(&self) -> f64 {
        self.lead().parameter()
    }

    pub fn speed(&self) -> f64 {
        self.lead().speed()
    }

    /// Largest deviation of a consecutive parameter gap from the spacing,
    /// measured around the loop.
    pub fn spacing_error(&self) -> f64 {
        self.cars
            .windows(2)
            .map(|pair| {
                let gap = pair[1].parameter() - pair[0].parameter();
                unit_delta(self.spacing, gap).abs()
            })
            .fold(0.0, f64::max)
    }
}
