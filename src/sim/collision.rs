//! Axis-aligned collision detection and platform response
//!
//! Everything in the world is a box: characters, platforms, and the bomb
//! handoff test. Boxes are anchored at their top-left corner with y pointing
//! down, matching canvas coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
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

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Point strictly inside the rectangle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }
}

/// Platforms are plain static rectangles
pub type Platform = Rect;

/// Which face of a platform a body was pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionSide {
    /// Landed on the platform
    Top,
    /// Bumped its head on the underside
    Bottom,
    /// Pushed out to the platform's left
    Left,
    /// Pushed out to the platform's right
    Right,
}

impl CollisionSide {
    /// Vertical resolutions zero vy, horizontal ones zero vx
    pub fn is_vertical(self) -> bool {
        matches!(self, CollisionSide::Top | CollisionSide::Bottom)
    }
}

/// Pick the face to push `body` out of `platform`
///
/// Compares penetration depth on both axes (the Minkowski sum of the two
/// boxes): the shallower axis wins, and the sign of the center-to-center
/// offset chooses the face on that axis. Returns `None` without overlap.
pub fn collision_side(body: &Rect, platform: &Rect) -> Option<CollisionSide> {
    if !body.overlaps(platform) {
        return None;
    }

    let offset = body.center() - platform.center();
    let half_w = (body.w + platform.w) / 2.0;
    let half_h = (body.h + platform.h) / 2.0;
    let pen_x = half_w - offset.x.abs();
    let pen_y = half_h - offset.y.abs();

    let side = if pen_y <= pen_x {
        if offset.y < 0.0 {
            CollisionSide::Top
        } else {
            CollisionSide::Bottom
        }
    } else if offset.x < 0.0 {
        CollisionSide::Left
    } else {
        CollisionSide::Right
    };
    Some(side)
}

/// Position of the body's top-left corner after being pushed out through `side`
pub fn snap_to_side(body: &Rect, platform: &Rect, side: CollisionSide) -> Vec2 {
    match side {
        CollisionSide::Top => Vec2::new(body.x, platform.y - body.h),
        CollisionSide::Bottom => Vec2::new(body.x, platform.bottom()),
        CollisionSide::Left => Vec2::new(platform.x - body.w, body.y),
        CollisionSide::Right => Vec2::new(platform.right(), body.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Sharing an edge is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(50.0, 50.0, 1.0, 1.0)));
    }

    #[test]
    fn test_landing_from_above() {
        let floor = Rect::new(0.0, 560.0, 1200.0, 40.0);
        let body = Rect::new(100.0, 505.0, 40.0, 60.0);
        assert_eq!(collision_side(&body, &floor), Some(CollisionSide::Top));
        let snapped = snap_to_side(&body, &floor, CollisionSide::Top);
        assert_eq!(snapped, Vec2::new(100.0, 500.0));
    }

    #[test]
    fn test_head_bump_from_below() {
        let ledge = Rect::new(50.0, 420.0, 200.0, 20.0);
        let body = Rect::new(100.0, 435.0, 40.0, 60.0);
        assert_eq!(collision_side(&body, &ledge), Some(CollisionSide::Bottom));
    }

    #[test]
    fn test_side_pushes() {
        let wall = Rect::new(500.0, 300.0, 20.0, 200.0);
        let from_left = Rect::new(465.0, 350.0, 40.0, 60.0);
        assert_eq!(collision_side(&from_left, &wall), Some(CollisionSide::Left));
        let from_right = Rect::new(515.0, 350.0, 40.0, 60.0);
        assert_eq!(collision_side(&from_right, &wall), Some(CollisionSide::Right));
    }

    #[test]
    fn test_miss() {
        let platform = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(collision_side(&Rect::new(20.0, 20.0, 5.0, 5.0), &platform), None);
    }

    proptest! {
        #[test]
        fn resolved_axis_no_longer_overlaps(
            bx in 0.0f32..300.0, by in 0.0f32..300.0,
            bw in 10.0f32..80.0, bh in 10.0f32..120.0,
            px in 0.0f32..300.0, py in 0.0f32..300.0,
            pw in 10.0f32..400.0, ph in 10.0f32..60.0,
        ) {
            let body = Rect::new(bx, by, bw, bh);
            let platform = Rect::new(px, py, pw, ph);
            if let Some(side) = collision_side(&body, &platform) {
                let pos = snap_to_side(&body, &platform, side);
                let moved = Rect::from_pos_size(pos, Vec2::new(bw, bh));
                if side.is_vertical() {
                    let apart = moved.bottom() <= platform.y + 1e-3
                        || moved.y >= platform.bottom() - 1e-3;
                    prop_assert!(apart);
                } else {
                    let apart = moved.right() <= platform.x + 1e-3
                        || moved.x >= platform.right() - 1e-3;
                    prop_assert!(apart);
                }
            } else {
                prop_assert!(!body.overlaps(&platform));
            }
        }
    }
}
