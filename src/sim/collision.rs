//! Axis-aligned bounding-box collision
//!
//! Everything that can collide in this game is a rectangle, and there are
//! only ever two entities plus a handful of bullets, so a strict AABB
//! overlap test per pair is all that's needed.

use glam::Vec2;

/// An axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Strict overlap: boxes sharing only an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn positive_overlap_hits() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(9.0, 9.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_hits() {
        let outer = aabb(0.0, 0.0, 100.0, 100.0);
        let inner = aabb(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn shared_edge_does_not_hit() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let right = aabb(10.0, 0.0, 10.0, 10.0);
        let below = aabb(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn shared_corner_does_not_hit() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let corner = aabb(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn disjoint_does_not_hit() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(50.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
    }
}
