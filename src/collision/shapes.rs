//! Circle and axis-aligned rectangle primitives

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Circle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap: touching circles do not overlap
    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(&other.center) < self.radius + other.radius
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance(&point) < self.radius
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two arbitrary corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Shrink on every side; collapses to the center line when too small
    pub fn inset(&self, margin: f32) -> Rect {
        let mx = margin.min(self.width / 2.0);
        let my = margin.min(self.height / 2.0);
        Rect::new(self.x + mx, self.y + my, self.width - 2.0 * mx, self.height - 2.0 * my)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Nearest point inside the rectangle
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.x, self.right()),
            point.y.clamp(self.y, self.bottom()),
        )
    }

    pub fn overlaps_circle(&self, circle: &Circle) -> bool {
        let nearest = self.clamp_point(circle.center);
        nearest.distance(&circle.center) < circle.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_overlap_is_strict() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vec2::new(10.0, 0.0), 5.0);
        assert!(!a.overlaps(&b));
        let c = Circle::new(Vec2::new(9.0, 0.0), 5.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_zero_radius_circle_contains_nothing() {
        let c = Circle::new(Vec2::new(1.0, 1.0), 0.0);
        assert!(!c.contains_point(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(Vec2::new(10.0, 5.0), Vec2::new(0.0, 15.0));
        assert_eq!(r, Rect::new(0.0, 5.0, 10.0, 10.0));
        assert_eq!(r.center(), Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_rect_circle_overlap() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.overlaps_circle(&Circle::new(Vec2::new(12.0, 5.0), 3.0)));
        assert!(!r.overlaps_circle(&Circle::new(Vec2::new(14.0, 5.0), 3.0)));
        assert!(r.overlaps_circle(&Circle::new(Vec2::new(5.0, 5.0), 1.0)));
    }

    #[test]
    fn test_inset_never_inverts() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert!(r.width >= 0.0 && r.height >= 0.0);
        assert_eq!(r.center(), Vec2::new(5.0, 2.0));
    }
}
