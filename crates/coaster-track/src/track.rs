//! The track: a closed curve plus cached length and arc-length mapping.

use coaster_core::traits::{BoundingBox, Validate};
use coaster_core::{ensure_finite, CoasterError, Result, Tolerance};
use coaster_geometry::{CurveEvaluator, Frame, InterpolationPolicy};
use coaster_math::{wrap_unit, Aabb3, Point3, Vector3};

use crate::arc_length::ArcLengthTable;
use crate::config::TrackConfig;

/// Read-only track geometry, built once and shared by every car.
///
/// The track parameter `t` is a fraction of the loop in `[0, 1)`; any finite
/// value is accepted and wrapped. With arc-length parameterization on, equal
/// steps in `t` cover equal distances along the track.
#[derive(Debug)]
pub struct Track {
    evaluator: CurveEvaluator,
    arc_length: ArcLengthTable,
    reparameterize: bool,
    point_samples: usize,
    bank_gain: f64,
    max_bank: f64,
}

impl Track {
    pub fn new(config: &TrackConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = CurveEvaluator::new(
            config.points(),
            config.interpolation,
            config.up(),
            Tolerance::default(),
        )?;
        let arc_length = ArcLengthTable::build(evaluator.curve(), config.length_samples);
        let track = Self {
            evaluator,
            arc_length,
            reparameterize: config.arc_length_parameterization,
            point_samples: config.point_samples,
            bank_gain: config.bank_gain,
            max_bank: config.max_bank_degrees.to_radians(),
        };
        track.validate()?;
        log::debug!(
            "track built: {} segments, length {:.3}",
            track.evaluator.num_segments(),
            track.length()
        );
        Ok(track)
    }

    /// Track through `points` with default sampling settings.
    pub fn from_points(points: &[Point3], interpolation: InterpolationPolicy) -> Result<Self> {
        Self::new(&TrackConfig {
            interpolation,
            ..TrackConfig::with_points(points)
        })
    }

    pub fn evaluator(&self) -> &CurveEvaluator {
        &self.evaluator
    }

    /// Approximate length: the sum of chords between uniform samples,
    /// computed once at construction.
    pub fn length(&self) -> f64 {
        self.arc_length.total()
    }

    pub fn is_arc_length_parameterized(&self) -> bool {
        self.reparameterize
    }

    /// Map a track parameter onto the underlying curve parameter.
    fn curve_parameter(&self, t: f64) -> Result<f64> {
        let t = wrap_unit(ensure_finite("t", t)?);
        Ok(self.curve_parameter_unchecked(t))
    }

    fn curve_parameter_unchecked(&self, t: f64) -> f64 {
        if self.reparameterize {
            self.arc_length.curve_parameter(t)
        } else {
            t
        }
    }

    pub fn position(&self, t: f64) -> Result<Point3> {
        self.evaluator.position(self.curve_parameter(t)?)
    }

    pub fn direction(&self, t: f64) -> Result<Vector3> {
        self.evaluator.direction(self.curve_parameter(t)?)
    }

    pub fn normal(&self, t: f64) -> Result<Vector3> {
        self.evaluator.normal(self.curve_parameter(t)?)
    }

    pub fn frame(&self, t: f64) -> Result<Frame> {
        self.evaluator.frame(self.curve_parameter(t)?)
    }

    /// Cosmetic roll in radians, bounded by the configured maximum bank.
    pub fn bank_angle(&self, t: f64) -> Result<f64> {
        self.evaluator
            .bank_angle(self.curve_parameter(t)?, self.bank_gain, self.max_bank)
    }

    /// Frame rolled by [`bank_angle`](Self::bank_angle); still orthonormal.
    pub fn banked_frame(&self, t: f64) -> Result<Frame> {
        let u = self.curve_parameter(t)?;
        let frame = self.evaluator.frame(u)?;
        let bank = self.evaluator.bank_angle(u, self.bank_gain, self.max_bank)?;
        Ok(frame.rolled(bank))
    }

    pub fn banked_normal(&self, t: f64) -> Result<Vector3> {
        Ok(self.banked_frame(t)?.normal)
    }

    /// Uniformly spaced points with the configured sample count.
    pub fn track_points(&self) -> TrackPoints<'_> {
        self.points_with(self.point_samples)
    }

    /// Uniformly spaced points; the seam is not repeated.
    pub fn points_with(&self, count: usize) -> TrackPoints<'_> {
        TrackPoints {
            track: self,
            index: 0,
            count,
        }
    }

    /// `count` frames at uniform track parameters, for sweeping meshes.
    pub fn frames(&self, count: usize, banked: bool) -> Result<Vec<Frame>> {
        if count == 0 {
            return Err(CoasterError::configuration("frame count must be positive"));
        }
        (0..count)
            .map(|i| {
                let t = i as f64 / count as f64;
                if banked {
                    self.banked_frame(t)
                } else {
                    self.frame(t)
                }
            })
            .collect()
    }

    pub fn bounds(&self) -> Aabb3 {
        let first = self.evaluator.curve().point_at(0.0);
        Aabb3::from_points(self.track_points()).unwrap_or(Aabb3::new(first, first))
    }
}

impl Validate for Track {
    fn validate(&self) -> Result<()> {
        let length = self.length();
        if !(length.is_finite() && length > 0.0) {
            return Err(CoasterError::configuration(format!(
                "track length must be finite and positive, got {length}"
            )));
        }
        for i in 0..64 {
            let frame = self.evaluator.frame(i as f64 / 64.0)?;
            let err = frame.orthonormality_error();
            if err > Tolerance::loose().linear {
                return Err(CoasterError::configuration(format!(
                    "track frame at sample {i} is not orthonormal (error {err})"
                )));
            }
        }
        Ok(())
    }
}

impl BoundingBox for Track {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let b = self.bounds();
        (b.min, b.max)
    }
}

/// Lazy, restartable sequence of uniformly spaced track points.
///
/// A clone continues from the same position; calling
/// [`Track::track_points`] again starts from the first point.
#[derive(Debug, Clone)]
pub struct TrackPoints<'a> {
    track: &'a Track,
    index: usize,
    count: usize,
}

impl Iterator for TrackPoints<'_> {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if self.index >= self.count {
            return None;
        }
        let t = self.index as f64 / self.count as f64;
        self.index += 1;
        let u = self.track.curve_parameter_unchecked(t);
        Some(self.track.evaluator.curve().point_at(u))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count.saturating_sub(self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for TrackPoints<'_> {}
