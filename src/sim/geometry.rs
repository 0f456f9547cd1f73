//! Axis-aligned rectangles
//!
//! Every entity in the game is a box in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test with half-open intervals: shared edges do not overlap
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Move this box so it lies inside `bounds` (as far as its size allows)
    pub fn clamp_within(&mut self, bounds: &Rect) {
        self.x = self.x.max(bounds.x).min(bounds.right() - self.w);
        self.y = self.y.max(bounds.y).min(bounds.bottom() - self.h);
    }

    /// Scale about the center, flooring each dimension at a minimum
    pub fn shrink_about_center(&mut self, scale: f32, min_w: f32, min_h: f32) {
        let center = self.center();
        self.w = (self.w * scale).floor().max(min_w);
        self.h = (self.h * scale).floor().max(min_h);
        self.x = (center.x - self.w / 2.0).floor();
        self.y = (center.y - self.h / 2.0).floor();
    }
}

/// Free-function form of [`Rect::intersects`]
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!intersects(&a, &right));
        assert!(!intersects(&a, &below));
    }

    #[test]
    fn test_parking_example() {
        let zone = Rect::new(300.0, 100.0, 80.0, 120.0);
        let car = Rect::new(310.0, 110.0, 54.0, 96.0);
        assert!(intersects(&car, &zone));
    }

    #[test]
    fn test_clamp_within() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut r = Rect::new(-20.0, 95.0, 10.0, 10.0);
        r.clamp_within(&bounds);
        assert_eq!((r.x, r.y), (0.0, 90.0));
    }

    #[test]
    fn test_shrink_keeps_center_and_floors() {
        let mut zone = Rect::new(300.0, 100.0, 80.0, 120.0);
        zone.shrink_about_center(0.8, 50.0, 80.0);
        assert_eq!((zone.w, zone.h), (64.0, 96.0));
        assert_eq!((zone.x, zone.y), (308.0, 112.0));

        zone.shrink_about_center(0.1, 50.0, 80.0);
        assert_eq!((zone.w, zone.h), (50.0, 80.0));
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }
    }
}
