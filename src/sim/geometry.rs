//! Axis-aligned box geometry
//!
//! World units: `x` grows rightward, `y` grows upward, ground sits at `y = 0`.
//! Boxes are anchored at their bottom-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    /// Negative extents are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Bottom-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Top-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Move the box by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// True when both axis projections overlap by a positive amount.
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let overlap = self.max().min(other.max()) - self.min().max(other.min());
        overlap.x > 0.0 && overlap.y > 0.0
    }

    /// Overlap rectangle, `None` when the boxes do not intersect
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        let min = self.min().max(other.min());
        let max = self.max().min(other.max());
        Some(Aabb::from_min_size(min, max - min))
    }

    /// True when the horizontal extent touches `[0, viewport_width]`
    pub fn is_x_visible(&self, viewport_width: f32) -> bool {
        self.right() >= 0.0 && self.x <= viewport_width
    }
}
