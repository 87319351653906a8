//! Overlap queries against static geometry and dynamic actors
//!
//! Static geometry is the union of walkable rectangles (rooms and corridor
//! strips). Anything outside every rectangle is wall.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::collision::shapes::{Circle, Rect};
use crate::core::types::Vec2;

/// Steps used when walking a blocked teleport back toward its start
const BACKTRACK_STEPS: u32 = 16;

/// Walkable area of one dungeon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionQuery {
    walkable: Vec<Rect>,
}

impl CollisionQuery {
    pub fn new(walkable: Vec<Rect>) -> Self {
        Self { walkable }
    }

    /// A single square arena centered on the origin
    pub fn arena(half_extent: f32) -> Self {
        let side = half_extent * 2.0;
        Self::new(vec![Rect::new(-half_extent, -half_extent, side, side)])
    }

    pub fn walkable(&self) -> &[Rect] {
        &self.walkable
    }

    /// Is a point inside any walkable rectangle?
    pub fn is_walkable(&self, point: Vec2) -> bool {
        self.walkable.iter().any(|r| r.contains(point))
    }

    /// Does a circle fit fully inside some walkable rectangle?
    ///
    /// The circle is not tested against the union of rectangles, so a seam
    /// between two rectangles is only passable when they overlap by at least
    /// the circle's radius. Corridor strips run center to center for this.
    pub fn circle_fits(&self, circle: &Circle) -> bool {
        self.walkable
            .iter()
            .any(|r| r.inset(circle.radius).contains(circle.center))
    }

    /// Move a circle by `delta`, sliding along walls one axis at a time
    pub fn resolve_movement(&self, from: Vec2, delta: Vec2, radius: f32) -> Vec2 {
        if delta.is_zero() {
            return from;
        }

        let full = from + delta;
        if self.circle_fits(&Circle::new(full, radius)) {
            return full;
        }

        let x_only = Vec2::new(from.x + delta.x, from.y);
        if delta.x != 0.0 && self.circle_fits(&Circle::new(x_only, radius)) {
            return x_only;
        }

        let y_only = Vec2::new(from.x, from.y + delta.y);
        if delta.y != 0.0 && self.circle_fits(&Circle::new(y_only, radius)) {
            return y_only;
        }

        from
    }

    /// Furthest point along `from -> to` where the circle still fits
    ///
    /// Used for teleports and knockback, which jump instead of sliding.
    pub fn furthest_fit(&self, from: Vec2, to: Vec2, radius: f32) -> Vec2 {
        if self.circle_fits(&Circle::new(to, radius)) {
            return to;
        }
        let delta = to - from;
        for step in (0..BACKTRACK_STEPS).rev() {
            let t = step as f32 / BACKTRACK_STEPS as f32;
            let candidate = from + delta * t;
            if self.circle_fits(&Circle::new(candidate, radius)) {
                return candidate;
            }
        }
        from
    }
}

/// Closest entry to `origin`, with its distance
pub fn nearest<T>(origin: Vec2, items: impl Iterator<Item = (T, Vec2)>) -> Option<(T, f32)> {
    items
        .map(|(item, pos)| (item, origin.distance(&pos)))
        .min_by_key(|(_, d)| OrderedFloat(*d))
}
