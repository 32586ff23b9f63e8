//! Sizes and rectangles.

use cgmath::{Point2, Vector2, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A width/height pair.
pub type Size = Vector2<f64>;

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Size,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Size) -> Rect {
        Rect { origin, size }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Returns true if the rectangle overlaps the vertical span `[start, end)`.
    pub fn intersects_span(&self, start: f64, end: f64) -> bool {
        (self.min_y() < end && start < self.max_y())
            || (self.size.y == 0. && self.origin.y >= start && self.origin.y < end)
    }

    /// Returns a new rectangle with the given size.
    pub fn with_size(&self, size: Size) -> Rect {
        Rect {
            origin: self.origin,
            size,
        }
    }
}

pub(crate) fn zero_size() -> Size {
    Vector2::zero()
}

/// True if neither dimension has been set.
pub fn is_unset(size: Size) -> bool {
    size.x <= 0. && size.y <= 0.
}

/// Serde format for sizes: `{ "width": .., "height": .. }`.
pub(crate) mod size_format {
    use super::*;

    #[derive(Default, Serialize, Deserialize)]
    struct Repr {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        height: f64,
    }

    pub(crate) fn serialize<S: Serializer>(size: &Size, serializer: S) -> Result<S::Ok, S::Error> {
        Repr {
            width: size.x,
            height: size.y,
        }
        .serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Size, D::Error> {
        let repr = Repr::deserialize(deserializer)?;
        Ok(Vector2::new(repr.width, repr.height))
    }
}
