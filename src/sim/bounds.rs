//! Axis-aligned bounding boxes for collision tests
//!
//! Every collidable entity is a rectangle anchored at its top-left corner:
//! - origin: top-left position in viewport space (Y grows downward)
//! - size: width/height bound once from the geometry registry

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    /// Two rectangles intersect iff they overlap on both axes.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0
        {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True once the rectangle has fully left `viewport`, with a margin of its own size
    pub fn is_far_outside(&self, viewport: Vec2) -> bool {
        self.origin.x > viewport.x + self.size.x
            || self.origin.x < -self.size.x * 2.0
            || self.origin.y > viewport.y + self.size.y
            || self.origin.y < -self.size.y * 2.0
    }
}
