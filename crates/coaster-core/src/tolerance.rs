/// Tolerances used when comparing track geometry.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance below which two points are considered coincident (model units)
    pub linear: f64,
    /// Sine of the smallest angle between two directions still treated as non-parallel
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-6;
    pub const DEFAULT_ANGULAR: f64 = 1e-3;

    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            angular: Self::DEFAULT_ANGULAR,
        }
    }

    /// Looser bounds for comparing sampled values, e.g. in property checks.
    pub fn loose() -> Self {
        Self {
            linear: 1e-4,
            angular: 1e-2,
        }
    }

    /// Check if a length is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }

    /// True when a cross-product magnitude between unit vectors signals near-parallel directions.
    pub fn is_parallel(self, sin_angle: f64) -> bool {
        sin_angle.abs() < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
