//! The player's invader
//!
//! Moves sideways under player control and bounces off the stage edges. Each
//! bounce on the opposite side from the previous one drops it toward the
//! ground and scores; bouncing twice on the same side only reverses it.

use glam::IVec2;

use super::collision::{Collidable, Rect};
use super::energy::{BarMode, EnergyBar};
use super::entity::Body;
use super::physics::{Motion, Steer, accelerate, displacement, resist};
use super::state::GameStatus;
use super::tick::TickInput;
use crate::assets::visuals;
use crate::tuning::Tuning;

/// Side of the last legitimate drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropSide {
    /// Fresh level, either side may be hit first
    #[default]
    NotHitAnySide,
    JustHitLeft,
    JustHitRight,
}

impl DropSide {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DropSide::NotHitAnySide),
            1 => Some(DropSide::JustHitLeft),
            2 => Some(DropSide::JustHitRight),
            _ => None,
        }
    }

    /// Whether hitting `side` now earns a drop
    pub fn grants_drop(self, side: DropSide) -> bool {
        matches!(
            (self, side),
            (DropSide::NotHitAnySide, DropSide::JustHitLeft | DropSide::JustHitRight)
                | (DropSide::JustHitLeft, DropSide::JustHitRight)
                | (DropSide::JustHitRight, DropSide::JustHitLeft)
        )
    }
}

/// Collectible abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    SpeedBoost,
    PulseShield,
}

impl PowerUpKind {
    /// 0 = no power-up, 1 = speed boost, 2 = pulse shield
    pub fn from_code(code: u8) -> Option<Option<Self>> {
        match code {
            0 => Some(None),
            1 => Some(Some(PowerUpKind::SpeedBoost)),
            2 => Some(Some(PowerUpKind::PulseShield)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speed_boost",
            PowerUpKind::PulseShield => "pulse_shield",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "speed_boost" | "speed" => Some(PowerUpKind::SpeedBoost),
            "pulse_shield" | "shield" => Some(PowerUpKind::PulseShield),
            _ => None,
        }
    }

    pub fn visual(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => visuals::SPEED_BOOST,
            PowerUpKind::PulseShield => visuals::PULSE_SHIELD,
        }
    }

    fn bar_mode(&self) -> BarMode {
        match self {
            PowerUpKind::SpeedBoost => BarMode::Continuous,
            PowerUpKind::PulseShield => BarMode::Segmented,
        }
    }
}

/// What happened to the invader during one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvaderReport {
    /// A drop was granted; the pop goes at this point
    pub drop_at: Option<IVec2>,
    /// Lower edge crossed the landing line this tick
    pub landed: bool,
    /// Fully below the stage after the post-level descent
    pub left_stage: bool,
}

#[derive(Debug, Clone)]
pub struct Invader {
    pub body: Body,
    pub velocity: i32,
    last_x: i32,
    pub last_drop: DropSide,
    pub power_up: Option<PowerUpKind>,
    /// Shield blocks damage while set and energy remains
    pub shield_on: bool,
}

impl Invader {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            body: Body::new(x, y, visuals::ALIEN_NORMAL),
            velocity: 0,
            last_x: x,
            last_drop: DropSide::NotHitAnySide,
            power_up: None,
            shield_on: false,
        }
    }

    /// Put the invader back at the top for a new level, left edge on the midline
    pub fn reset_for_level(&mut self, stage_width: i32) {
        self.body.pos = IVec2::new(stage_width / 2, 0);
        self.last_x = self.body.pos.x;
        self.last_drop = DropSide::NotHitAnySide;
    }

    /// Ignores unknown codes
    pub fn set_drop_side_code(&mut self, code: u8) {
        if let Some(side) = DropSide::from_code(code) {
            self.last_drop = side;
        }
    }

    /// Activate a collected power-up; the energy bar refills and shows
    pub fn apply_power_up(&mut self, kind: PowerUpKind, energy: &mut EnergyBar) {
        self.power_up = Some(kind);
        energy.set_mode(kind.bar_mode());
        energy.visible = true;
        log::debug!("Power-up active: {}", kind.as_str());
    }

    /// Ignores unknown codes; 0 clears the power-up
    pub fn set_power_up_code(&mut self, code: u8, energy: &mut EnergyBar) {
        match PowerUpKind::from_code(code) {
            Some(Some(kind)) => self.apply_power_up(kind, energy),
            Some(None) => self.power_up = None,
            None => {}
        }
    }

    /// Centre of the collidable area
    pub fn center(&self) -> IVec2 {
        self.hitbox().center()
    }

    fn motion_for(&mut self, input: &TickInput, dt_ms: u64, tuning: &Tuning, energy: &mut EnergyBar) -> Motion {
        let base = tuning.invader.motion;
        if !input.activate {
            return base;
        }
        match self.power_up {
            Some(PowerUpKind::SpeedBoost) => {
                self.shield_on = false;
                let rate = tuning.invader.boost_drain_percent / tuning.invader.boost_drain_period_ms;
                energy.decrease(rate * dt_ms as f64);
                if energy.is_empty() {
                    self.power_up = None;
                    energy.visible = false;
                    log::debug!("Speed boost exhausted");
                }
                tuning.invader.boost_motion
            }
            Some(PowerUpKind::PulseShield) => {
                self.shield_on = true;
                base
            }
            None => base,
        }
    }

    pub fn update(
        &mut self,
        input: &TickInput,
        status: GameStatus,
        dt_ms: u64,
        tuning: &Tuning,
        energy: &mut EnergyBar,
    ) -> InvaderReport {
        let mut report = InvaderReport::default();
        self.last_x = self.body.pos.x;

        let mut motion = tuning.invader.motion;
        if status == GameStatus::LevelInProgress {
            motion = self.motion_for(input, dt_ms, tuning, energy);
            if input.move_left {
                self.velocity = accelerate(self.velocity, Steer::Left, &motion, dt_ms);
                self.body.sprite.set_visual(visuals::ALIEN_LEFT);
            } else if input.move_right {
                self.velocity = accelerate(self.velocity, Steer::Right, &motion, dt_ms);
                self.body.sprite.set_visual(visuals::ALIEN_RIGHT);
            } else {
                self.body.sprite.set_visual(visuals::ALIEN_NORMAL);
            }
        }

        self.velocity = resist(self.velocity, &motion, dt_ms);
        self.body.pos.x = self.body.pos.x.saturating_add(displacement(self.velocity, dt_ms));

        if status == GameStatus::LevelComplete {
            let fall = displacement(tuning.invader.exit_speed, dt_ms);
            self.body.pos.y = self.body.pos.y.saturating_add(fall);
            report.left_stage = self.body.pos.y > tuning.stage.height;
            return report;
        }

        report.drop_at = self.check_sides(tuning);
        report.landed = status == GameStatus::LevelInProgress
            && self.body.pos.y.saturating_add(self.body.height())
                > tuning.stage.height - tuning.stage.landing_margin;
        report
    }

    fn check_sides(&mut self, tuning: &Tuning) -> Option<IVec2> {
        let right_limit = tuning.stage.width - self.body.width();
        if self.body.pos.x <= 0 {
            self.body.pos.x = self.last_x;
            self.velocity = self.velocity.abs();
            self.check_drop(DropSide::JustHitLeft, tuning)
        } else if self.body.pos.x >= right_limit {
            self.body.pos.x = self.last_x;
            self.velocity = -self.velocity.abs();
            self.check_drop(DropSide::JustHitRight, tuning)
        } else {
            None
        }
    }

    /// Drop if `side` alternates with the last recorded drop
    pub fn check_drop(&mut self, side: DropSide, tuning: &Tuning) -> Option<IVec2> {
        if !self.last_drop.grants_drop(side) {
            return None;
        }
        self.body.pos.y = self.body.pos.y.saturating_add(tuning.invader.drop_distance);
        self.last_drop = side;
        Some(self.body.pos + IVec2::new(self.body.width() / 2, self.body.height() / 2))
    }
}

impl Collidable for Invader {
    /// Lower half of the visual
    fn hitbox(&self) -> Rect {
        let half = self.body.height() / 2;
        Rect::new(
            self.body.pos.x,
            self.body.pos.y.saturating_add(half),
            self.body.width(),
            half,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Size;
    use crate::sim::entity::Sprite;

    fn invader_at(x: i32, y: i32) -> Invader {
        let mut inv = Invader::new(x, y);
        inv.body.sprite = Sprite::sized(visuals::ALIEN_NORMAL, Size::new(32, 24));
        inv
    }

    fn playing() -> GameStatus {
        GameStatus::LevelInProgress
    }

    fn held(left: bool, right: bool, activate: bool) -> TickInput {
        TickInput {
            move_left: left,
            move_right: right,
            activate,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_side_twice_drops_once() {
        let tuning = Tuning::default();
        let mut inv = invader_at(100, 0);
        assert!(inv.check_drop(DropSide::JustHitLeft, &tuning).is_some());
        assert!(inv.check_drop(DropSide::JustHitLeft, &tuning).is_none());
        assert_eq!(inv.body.pos.y, 15);
        assert!(inv.check_drop(DropSide::JustHitRight, &tuning).is_some());
        assert_eq!(inv.body.pos.y, 30);
    }

    #[test]
    fn test_drop_pop_at_centre() {
        let tuning = Tuning::default();
        let mut inv = invader_at(100, 0);
        let at = inv.check_drop(DropSide::JustHitRight, &tuning).unwrap();
        assert_eq!(at, IVec2::new(116, 15 + 12));
    }

    #[test]
    fn test_left_edge_bounces_and_drops() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(2, 0);
        inv.velocity = -300;
        let report = inv.update(&held(true, false, false), playing(), 16, &tuning, &mut energy);
        assert_eq!(inv.body.pos.x, 2);
        assert!(inv.velocity > 0);
        assert!(report.drop_at.is_some());
        assert_eq!(inv.last_drop, DropSide::JustHitLeft);
    }

    #[test]
    fn test_right_edge_reflects_negative() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(384 - 32 - 1, 0);
        inv.velocity = 300;
        inv.last_drop = DropSide::JustHitRight;
        let report = inv.update(&TickInput::default(), playing(), 16, &tuning, &mut energy);
        assert!(inv.velocity < 0);
        // same side as before: bounce only
        assert!(report.drop_at.is_none());
        assert_eq!(inv.body.pos.y, 0);
    }

    #[test]
    fn test_huge_delta_reverts_position() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 0);
        inv.velocity = 300;
        inv.update(&held(false, true, false), playing(), 10_000_000, &tuning, &mut energy);
        assert_eq!(inv.body.pos.x, 150);
        assert!(inv.velocity <= 0);
    }

    #[test]
    fn test_speed_boost_raises_cap_and_drains() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 0);
        inv.apply_power_up(PowerUpKind::SpeedBoost, &mut energy);
        inv.shield_on = true;
        inv.velocity = 300;
        inv.update(&held(false, true, true), playing(), 100, &tuning, &mut energy);
        // 300 + 140 - 30
        assert_eq!(inv.velocity, 410);
        assert!(!inv.shield_on);
        assert!((energy.energy() - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_boost_runs_out() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 0);
        inv.apply_power_up(PowerUpKind::SpeedBoost, &mut energy);
        inv.update(&held(false, false, true), playing(), 6000, &tuning, &mut energy);
        assert_eq!(inv.power_up, None);
        assert!(!energy.visible);
        assert!(energy.is_empty());
    }

    #[test]
    fn test_pulse_shield_engages_while_held() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 0);
        inv.apply_power_up(PowerUpKind::PulseShield, &mut energy);
        inv.update(&held(false, false, true), playing(), 16, &tuning, &mut energy);
        assert!(inv.shield_on);
        // latches after release
        inv.update(&held(false, false, false), playing(), 16, &tuning, &mut energy);
        assert!(inv.shield_on);
        assert_eq!(energy.energy(), 100.0);
    }

    #[test]
    fn test_landing_detected() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        // lower edge at 600 - 75 + 1
        let mut inv = invader_at(150, 600 - 75 - 24 + 1);
        let report = inv.update(&TickInput::default(), playing(), 16, &tuning, &mut energy);
        assert!(report.landed);

        let mut inv = invader_at(150, 600 - 75 - 24);
        let report = inv.update(&TickInput::default(), playing(), 16, &tuning, &mut energy);
        assert!(!report.landed);
    }

    #[test]
    fn test_descends_after_level_complete() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 590);
        let report = inv.update(&TickInput::default(), GameStatus::LevelComplete, 20, &tuning, &mut energy);
        assert_eq!(inv.body.pos.y, 600);
        assert!(!report.left_stage);
        assert!(!report.landed);
        let report = inv.update(&TickInput::default(), GameStatus::LevelComplete, 2, &tuning, &mut energy);
        assert_eq!(inv.body.pos.y, 601);
        assert!(report.left_stage);
    }

    #[test]
    fn test_no_control_outside_play() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 0);
        inv.update(&held(true, false, false), GameStatus::NewGame, 100, &tuning, &mut energy);
        assert_eq!(inv.velocity, 0);
        assert_eq!(inv.body.pos.x, 150);
    }

    #[test]
    fn test_hitbox_is_lower_half() {
        let inv = invader_at(10, 20);
        assert_eq!(inv.hitbox(), Rect::new(10, 32, 32, 12));
    }

    #[test]
    fn test_reset_for_level() {
        let mut inv = invader_at(10, 400);
        inv.last_drop = DropSide::JustHitRight;
        inv.reset_for_level(384);
        assert_eq!(inv.body.pos, IVec2::new(192, 0));
        assert_eq!(inv.last_drop, DropSide::NotHitAnySide);
    }

    #[test]
    fn test_far_below_stage_keeps_bounded_geometry() {
        let tuning = Tuning::default();
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(150, 590);
        let report = inv.update(&TickInput::default(), GameStatus::LevelComplete, u64::MAX, &tuning, &mut energy);
        assert!(report.left_stage);
        assert_eq!(inv.body.pos.y, i32::MAX);
        assert_eq!(inv.hitbox().max_y(), i32::MAX);
        assert_eq!(inv.center().y, i32::MAX);

        let report = inv.update(&TickInput::default(), playing(), u64::MAX, &tuning, &mut energy);
        assert!(report.landed);
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        let mut energy = EnergyBar::default();
        let mut inv = invader_at(10, 20);
        inv.set_power_up_code(2, &mut energy);
        inv.set_power_up_code(9, &mut energy);
        assert_eq!(inv.power_up, Some(PowerUpKind::PulseShield));
        inv.set_drop_side_code(1);
        inv.set_drop_side_code(200);
        assert_eq!(inv.last_drop, DropSide::JustHitLeft);
        inv.set_power_up_code(0, &mut energy);
        assert_eq!(inv.power_up, None);
    }
}
