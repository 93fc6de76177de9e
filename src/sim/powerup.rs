//! Falling power-up pickups dropped by the tank's special-attack roll

use rand::Rng;

use super::collision::{Collidable, Rect};
use super::entity::{Body, Sprite};
use super::invader::PowerUpKind;
use super::physics::displacement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    Falling,
    Collected(PowerUpKind),
    /// Fell past the bottom of the stage
    Missed,
}

/// Coin flip between the two power-ups
pub fn random_kind(rng: &mut impl Rng) -> PowerUpKind {
    if rng.random::<f64>() > 0.5 {
        PowerUpKind::SpeedBoost
    } else {
        PowerUpKind::PulseShield
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub body: Body,
    pub removed: bool,
}

impl PowerUp {
    /// Place a new pickup just above the stage at a random column.
    ///
    /// `sprite` should already be resolved so the hitbox width is known.
    pub fn spawn(id: u32, kind: PowerUpKind, sprite: Sprite, stage_width: i32, rng: &mut impl Rng) -> Self {
        let mut power_up = Self {
            id,
            kind,
            body: Body {
                pos: glam::IVec2::ZERO,
                sprite,
            },
            removed: false,
        };
        let span = (stage_width - power_up.hitbox().w).max(0);
        power_up.body.pos.x = (rng.random::<f64>() * f64::from(span)) as i32;
        power_up.body.pos.y = -power_up.body.height();
        power_up
    }

    pub fn update(&mut self, dt_ms: u64, speed: i32, target: &Rect, stage_height: i32) -> PickupOutcome {
        self.body.pos.y = self.body.pos.y.saturating_add(displacement(speed, dt_ms));

        let hitbox = self.hitbox();
        if hitbox.intersects(target) {
            self.removed = true;
            return PickupOutcome::Collected(self.kind);
        }
        if hitbox.min_y() > stage_height {
            self.removed = true;
            return PickupOutcome::Missed;
        }
        PickupOutcome::Falling
    }
}

impl Collidable for PowerUp {
    /// The art has transparent margins, trimmed per kind
    fn hitbox(&self) -> Rect {
        let Body { pos, .. } = self.body;
        let (w, h) = (self.body.width(), self.body.height());
        match self.kind {
            PowerUpKind::SpeedBoost => Rect::new(pos.x.saturating_add(7), pos.y, w - 23, h),
            PowerUpKind::PulseShield => Rect::new(pos.x, pos.y.saturating_add(4), w - 1, h - 4),
        }
    }
}
