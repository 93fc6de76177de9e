//! Axis-aligned bounding boxes
//!
//! Only two pairs are ever tested: shell vs invader and power-up vs invader.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Integer rectangle, `x`/`y` is the top-left corner, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(pos: IVec2, w: i32, h: i32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    /// Smallest integer rectangle covering a set of points
    pub fn covering(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let x = min.x.floor() as i32;
        let y = min.y.floor() as i32;
        Self::new(x, y, max.x.ceil() as i32 - x, max.y.ceil() as i32 - y)
    }

    #[inline]
    pub fn min_y(&self) -> i32 {
        self.y
    }

    /// Right edge, pinned at `i32::MAX` for boxes flung off the stage
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    #[inline]
    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Centre point, truncated toward the top-left
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.x.saturating_add(self.w / 2), self.y.saturating_add(self.h / 2))
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Projections overlap on both axes; shared edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

/// Something that takes part in hit tests
pub trait Collidable {
    fn hitbox(&self) -> Rect;

    fn collides_with(&self, other: &impl Collidable) -> bool
    where
        Self: Sized,
    {
        self.hitbox().intersects(&other.hitbox())
    }
}

impl Collidable for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}
