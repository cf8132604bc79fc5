//! Collision detection for the catch test
//!
//! Everything that can collide is an axis-aligned rectangle in world space,
//! so the test is a pair of open-interval overlap checks. No contact normal
//! or penetration depth is needed: an item either ends up in the catch
//! zone or it doesn't.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` anchored at its bottom-centre point `anchor`
    pub fn from_bottom_center(anchor: Vec2, size: Vec2) -> Self {
        let half_w = size.x / 2.0;
        Self {
            min: Vec2::new(anchor.x - half_w, anchor.y),
            max: Vec2::new(anchor.x + half_w, anchor.y + size.y),
        }
    }

    /// Rectangle of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// True iff the rectangles overlap on both axes. Shared edges don't count.
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Aabb {
        Aabb::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_containment() {
        let outer = rect(-100.0, -100.0, 100.0, 100.0);
        let inner = rect(-1.0, -1.0, 1.0, 1.0);
        assert!(intersects(&outer, &inner));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!intersects(&a, &rect(10.0, 0.0, 20.0, 10.0)));
        assert!(!intersects(&a, &rect(0.0, 10.0, 10.0, 20.0)));
        assert!(!intersects(&a, &rect(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn test_single_axis_overlap_misses() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        // Overlaps on x only
        assert!(!intersects(&a, &rect(5.0, 20.0, 15.0, 30.0)));
        // Overlaps on y only
        assert!(!intersects(&a, &rect(20.0, 5.0, 30.0, 15.0)));
    }

    #[test]
    fn test_bottom_center_anchor() {
        let b = Aabb::from_bottom_center(Vec2::new(10.0, 100.0), Vec2::new(40.0, 50.0));
        assert_eq!(b.min, Vec2::new(-10.0, 100.0));
        assert_eq!(b.max, Vec2::new(30.0, 150.0));
        assert_eq!(b.width(), 40.0);
        assert_eq!(b.height(), 50.0);
    }

    proptest! {
        #[test]
        fn prop_intersection_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 0.1f32..50.0, ah in 0.1f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 0.1f32..50.0, bh in 0.1f32..50.0,
        ) {
            let a = rect(ax, ay, ax + aw, ay + ah);
            let b = rect(bx, by, bx + bw, by + bh);
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_rect_overlaps_itself(x in -100.0f32..100.0, y in -100.0f32..100.0, w in 0.1f32..50.0, h in 0.1f32..50.0) {
            let a = rect(x, y, x + w, y + h);
            prop_assert!(intersects(&a, &a));
        }
    }
}
