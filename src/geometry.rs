//! Axis-aligned bounding boxes in fixed-point units.

use crate::fixed::Fixed;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in fixed-point world units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum (left) X edge.
    pub min_x: Fixed,
    /// Maximum (right) X edge.
    pub max_x: Fixed,
    /// Minimum (bottom) Y edge.
    pub min_y: Fixed,
    /// Maximum (top) Y edge.
    pub max_y: Fixed,
}

impl Aabb {
    /// Builds an AABB centered at `(center_x, center_y)` with the given full
    /// `width`/`height`.
    #[must_use]
    pub fn centered(center_x: Fixed, center_y: Fixed, width: Fixed, height: Fixed) -> Self {
        let half_w = Fixed::from_raw(width.raw() / 2);
        let half_h = Fixed::from_raw(height.raw() / 2);
        Aabb {
            min_x: center_x - half_w,
            max_x: center_x + half_w,
            min_y: center_y - half_h,
            max_y: center_y + half_h,
        }
    }

    /// Translates this box by `(dx, dy)`.
    #[must_use]
    pub fn translated(self, dx: Fixed, dy: Fixed) -> Self {
        Aabb {
            min_x: self.min_x + dx,
            max_x: self.max_x + dx,
            min_y: self.min_y + dy,
            max_y: self.max_y + dy,
        }
    }

    /// `true` iff the two boxes overlap. Touching edges (sharing a boundary
    /// with zero-area intersection) do not count as overlapping: both
    /// comparisons are strict, per spec §4.2.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// Center point of the box.
    #[must_use]
    pub fn center(&self) -> (Fixed, Fixed) {
        (
            Fixed::from_raw((self.min_x.raw() + self.max_x.raw()) / 2),
            Fixed::from_raw((self.min_y.raw() + self.max_y.raw()) / 2),
        )
    }
}
