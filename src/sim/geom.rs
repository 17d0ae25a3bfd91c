//! Segment geometry for wands and obstacles
//!
//! Everything here is yes/no: the game only needs to know *whether* a wand
//! touches something, never where. Orientation uses a strict inequality, so
//! exactly collinear triples count as clockwise; levels are authored to avoid
//! them.

use glam::Vec2;

use crate::consts::{CLOSE_EPSILON, FAR_DISTANCE};

/// Axis-aligned rectangle given by two opposite corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Square of the given half extent centered on `center`
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        Self::new(center - Vec2::splat(half_extent), center + Vec2::splat(half_extent))
    }

    /// Corners in winding order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Are both coordinate deltas under the latch tolerance?
#[inline]
pub fn close_enough(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < CLOSE_EPSILON && (a.y - b.y).abs() < CLOSE_EPSILON
}

/// Counter-clockwise test for the triple (a, b, c)
#[inline]
pub fn ccw(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Does segment p1-p2 straddle segment p3-p4?
#[inline]
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

/// Cheap reject: farther apart than any wand can reach
#[inline]
pub fn too_far(a: Vec2, b: Vec2) -> bool {
    a.distance(b) > FAR_DISTANCE
}

/// Segment vs. rectangle outline
///
/// Bails out early when `start` is far from every corner, otherwise checks the
/// four edges in order. A segment lying wholly inside the rectangle does not
/// count.
pub fn segment_rect_intersects(start: Vec2, end: Vec2, corner1: Vec2, corner2: Vec2) -> bool {
    let corners = Rect::new(corner1, corner2).corners();

    if corners.iter().all(|&c| too_far(start, c)) {
        return false;
    }

    (0..4).any(|i| segments_intersect(start, end, corners[i], corners[(i + 1) % 4]))
}
