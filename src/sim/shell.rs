//! Tank shells
//!
//! A shell's position is kept as a translation + rotation transform so that
//! angled shells from an array volley travel along their heading. The shell's
//! hitbox is the integer bounding box of its transformed sprite rectangle.

use glam::{Affine2, IVec2, Vec2};

use super::collision::{Collidable, Rect};
use super::entity::Sprite;
use super::physics::displacement;
use crate::assets::visuals;

/// Result of moving a shell one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellOutcome {
    /// Still flying
    Flying,
    /// Struck the invader; `shielded` means the shield absorbed it
    Hit { shielded: bool, at: IVec2 },
    /// Passed the top of the stage
    OffStage,
}

#[derive(Debug, Clone)]
pub struct Shell {
    pub id: u32,
    /// Muzzle position the shell was fired from
    pub origin: Vec2,
    /// Heading deviation from straight up (radians, fixed for the lifetime)
    pub angle: f32,
    /// Distance travelled along the heading
    pub travel: i32,
    pub sprite: Sprite,
    /// Above the invader (or the stage): can no longer hit anything
    pub done: bool,
    pub removed: bool,
}

impl Shell {
    pub fn new(id: u32, x: i32, y: i32, angle: f32) -> Self {
        Self {
            id,
            origin: Vec2::new(x as f32, y as f32),
            angle,
            travel: 0,
            sprite: Sprite::new(visuals::SHELL),
            done: false,
            removed: false,
        }
    }

    /// Local sprite space to stage space
    pub fn transform(&self) -> Affine2 {
        Affine2::from_translation(self.origin)
            * Affine2::from_angle(self.angle)
            * Affine2::from_translation(Vec2::new(0.0, -(self.travel as f32)))
    }

    /// Stage position of the sprite's top-left corner
    pub fn anchor(&self) -> Vec2 {
        self.transform().transform_point2(Vec2::ZERO)
    }

    /// Move along the heading, then resolve against the invader's hitbox
    pub fn update(&mut self, dt_ms: u64, speed: i32, target: &Rect, shielded: bool) -> ShellOutcome {
        self.travel = self.travel.saturating_add(displacement(speed, dt_ms));

        let hitbox = self.hitbox();
        self.done = hitbox.max_y() < target.min_y() || hitbox.max_y() < 0;

        if hitbox.intersects(target) {
            self.removed = true;
            return ShellOutcome::Hit {
                shielded,
                at: hitbox.center(),
            };
        }

        if hitbox.max_y() < 0 {
            self.removed = true;
            return ShellOutcome::OffStage;
        }

        ShellOutcome::Flying
    }
}

impl Collidable for Shell {
    fn hitbox(&self) -> Rect {
        let w = self.sprite.size.w as f32;
        let h = self.sprite.size.h as f32;
        let t = self.transform();
        let corners = [
            t.transform_point2(Vec2::new(0.0, 0.0)),
            t.transform_point2(Vec2::new(w, 0.0)),
            t.transform_point2(Vec2::new(0.0, h)),
            t.transform_point2(Vec2::new(w, h)),
        ];
        Rect::covering(&corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Size;

    fn shell(x: i32, y: i32, angle: f32) -> Shell {
        let mut s = Shell::new(1, x, y, angle);
        s.sprite = Sprite::sized(visuals::SHELL, Size::new(4, 10));
        s
    }

    fn far_target() -> Rect {
        Rect::new(1000, 0, 10, 10)
    }

    #[test]
    fn test_vertical_shell_moves_up() {
        let mut s = shell(100, 450, 0.0);
        assert_eq!(s.update(100, 400, &far_target(), false), ShellOutcome::Flying);
        assert_eq!(s.hitbox(), Rect::new(100, 410, 4, 10));
    }

    #[test]
    fn test_angled_shell_drifts_sideways() {
        let mut s = shell(100, 450, 45f32.to_radians());
        s.update(1000, 400, &far_target(), false);
        let hb = s.hitbox();
        // rotated clockwise on screen: heading up and to the right
        assert!(hb.x > 300);
        assert!(hb.y < 200);
    }

    #[test]
    fn test_done_once_above_invader() {
        let target = Rect::new(500, 300, 32, 12);
        let mut s = shell(100, 450, 0.0);
        s.update(100, 400, &target, false);
        assert!(!s.done);
        s.update(300, 400, &target, false);
        // bottom edge at 450 - 160 + 10 = 300: not above yet
        assert!(!s.done);
        s.update(5, 400, &target, false);
        assert!(s.done);
        assert!(!s.removed);
    }

    #[test]
    fn test_hit_reports_centre_and_marks_removed() {
        let target = Rect::new(90, 405, 32, 12);
        let mut s = shell(100, 450, 0.0);
        let outcome = s.update(100, 400, &target, true);
        assert_eq!(
            outcome,
            ShellOutcome::Hit {
                shielded: true,
                at: IVec2::new(102, 415)
            }
        );
        assert!(s.removed);
    }

    #[test]
    fn test_leaves_top_of_stage() {
        let mut s = shell(100, 450, 0.0);
        // one enormous stall
        let outcome = s.update(60_000, 400, &far_target(), false);
        assert_eq!(outcome, ShellOutcome::OffStage);
        assert!(s.done);
        assert!(s.removed);
    }
}
