use crate::error::Result;

/// Check the invariants of a configuration or a constructed entity.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Axis-aligned extent of sampled geometry, returned as `(min, max)` corners.
pub trait BoundingBox {
    type Point;
    fn bounding_box(&self) -> (Self::Point, Self::Point);
}
