//! Axis-aligned rectangles on the ground plane.
//!
//! Ground-plane coordinates are `Vec2(x, z)`; the vertical axis is implicit.

use glam::Vec2;
use serde::Deserialize;

use crate::error::{LayoutError, LayoutResult};

/// Axis-aligned rectangle with inclusive edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Smallest rectangle containing both corners, in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expand(self, amount: f32) -> Self {
        Self::new(self.min - Vec2::splat(amount), self.max + Vec2::splat(amount))
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Rectangular extent of the world.
///
/// Constrains both the placement scan and vehicle travel.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    /// Create bounds, rejecting empty, inverted, or non-finite extents.
    pub fn new(min: Vec2, max: Vec2) -> LayoutResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Square bounds of side `2 * half_extent` centered at the origin.
    pub fn square(half_extent: f32) -> LayoutResult<Self> {
        Self::new(Vec2::splat(-half_extent), Vec2::splat(half_extent))
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(LayoutError::InvalidBounds {
                detail: format!("non-finite extent {} .. {}", self.min, self.max),
            });
        }
        if self.min.cmpge(self.max).any() {
            return Err(LayoutError::InvalidBounds {
                detail: format!("min {} must be below max {} on both axes", self.min, self.max),
            });
        }
        Ok(())
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.as_rect().contains(point)
    }

    /// Clamp a point componentwise into the bounds.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Shrink by `margin` on every side.
    ///
    /// An axis narrower than twice the margin collapses to its midpoint.
    pub fn shrink(&self, margin: f32) -> Self {
        let center = self.center();
        let min = (self.min + Vec2::splat(margin)).min(center);
        let max = (self.max - Vec2::splat(margin)).max(center);
        Self { min, max }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.min, self.max)
    }
}
