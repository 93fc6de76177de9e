//! Computer-controlled tank
//!
//! The tank tracks the invader along its rail and fires from two alternating
//! barrels. Every `special_delay` ms a roll may switch it into a burst or an
//! array volley, and a high roll also drops a power-up. Both odds grow with
//! the level number.

use rand::Rng;

use super::entity::Body;
use super::physics::{Steer, accelerate, displacement, resist};
use super::shell::Shell;
use crate::assets::visuals;
use crate::tuning::TankTuning;

/// Attack pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireMode {
    /// One shell at a time, after the previous one is spent
    #[default]
    Normal,
    /// Rapid salvo of straight shells
    Burst,
    /// Spread of angled shells in one tick
    Array,
}

impl FireMode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FireMode::Normal),
            1 => Some(FireMode::Burst),
            2 => Some(FireMode::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FireMode::Normal => "normal",
            FireMode::Burst => "burst",
            FireMode::Array => "array",
        }
    }
}

/// Outcome of one special-attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRoll {
    pub mode: FireMode,
    pub spawn_power_up: bool,
}

/// Attack odds for `level`, as percentages `(burst, array)`
pub fn special_odds(level: u32, tuning: &TankTuning) -> (f64, f64) {
    let half = f64::from(level / 2);
    let burst = (tuning.burst_base + half).min(tuning.burst_cap);
    let mut array = tuning.array_base + half;
    if array > tuning.array_threshold {
        array = tuning.array_cap;
    }
    (burst, array)
}

/// Map a roll in `[0, 100)` to a fire mode.
///
/// The top `burst` percent selects a burst and the `array` percent below that
/// selects an array; any roll above `power_up_roll` also drops a power-up.
pub fn select_mode(chance: f64, level: u32, tuning: &TankTuning) -> SpecialRoll {
    let (burst, array) = special_odds(level, tuning);
    let burst_bottom = 100.0 - burst;
    let array_bottom = burst_bottom - array;

    let mode = if chance >= burst_bottom {
        FireMode::Burst
    } else if chance >= array_bottom {
        FireMode::Array
    } else {
        FireMode::Normal
    };
    SpecialRoll {
        mode,
        spawn_power_up: chance > tuning.power_up_roll,
    }
}

/// Interval between special-attack rolls for `level`
pub fn special_delay(level: u32, tuning: &TankTuning) -> u64 {
    let delay = tuning.special_delay_base - i64::from(level) * tuning.special_delay_per_level;
    delay.max(0) as u64
}

/// A shell the tank wants spawned this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub x: i32,
    pub y: i32,
    /// Radians from vertical
    pub angle: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankReport {
    pub shots: Vec<Shot>,
    pub spawn_power_up: bool,
}

/// Per-tick context handed to [`Tank::update`]
pub struct TankContext<'a> {
    /// Horizontal centre of the invader hitbox
    pub target_x: i32,
    /// Steering and firing only happen while the level is in progress
    pub in_progress: bool,
    pub now_ms: u64,
    pub dt_ms: u64,
    pub level: u32,
    pub stage_width: i32,
    pub shells: &'a [Shell],
    pub tuning: &'a TankTuning,
}

#[derive(Debug, Clone)]
pub struct Tank {
    pub body: Body,
    pub velocity: i32,
    last_velocity: i32,
    /// Where the velocity last changed sign
    last_flip_x: i32,
    ship_is_right: bool,
    pub fire_mode: FireMode,
    burst_count: u32,
    pub last_fired_ms: u64,
    right_last_fired: bool,
    /// Time of the last special roll; unset until the first one
    last_check_ms: Option<u64>,
    /// Normal-fire countdown: start time and wait length
    wait: Option<(u64, f64)>,
    special_delay: u64,
    /// Ids of shells this tank fired, in firing order
    pub tracked: Vec<u32>,
}

impl Tank {
    /// A fresh tank rolls for a special attack on its first in-progress tick
    pub fn new(x: i32, y: i32, level: u32, tuning: &TankTuning) -> Self {
        Self {
            body: Body::new(x, y, visuals::TURRET_IDLE),
            velocity: 0,
            last_velocity: 0,
            last_flip_x: x,
            ship_is_right: false,
            fire_mode: FireMode::Normal,
            burst_count: 0,
            last_fired_ms: 0,
            right_last_fired: true,
            last_check_ms: None,
            wait: None,
            special_delay: special_delay(level, tuning),
            tracked: Vec::new(),
        }
    }

    pub fn special_delay(&self) -> u64 {
        self.special_delay
    }

    /// Ignores unknown codes
    pub fn set_fire_mode_code(&mut self, code: u8) {
        if let Some(mode) = FireMode::from_code(code) {
            self.fire_mode = mode;
        }
    }

    pub fn track(&mut self, shell_id: u32) {
        if !self.tracked.contains(&shell_id) {
            self.tracked.push(shell_id);
        }
    }

    /// Drop ids of shells that no longer exist
    pub fn forget_removed(&mut self, shells: &[Shell]) {
        self.tracked
            .retain(|id| shells.iter().any(|s| s.id == *id && !s.removed));
    }

    fn center_x(&self) -> i32 {
        self.body.pos.x.saturating_add(self.body.width() / 2)
    }

    fn special_due(&self, now_ms: u64) -> bool {
        self.last_check_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.special_delay)
    }

    pub fn update(&mut self, ctx: &TankContext, rng: &mut impl Rng) -> TankReport {
        let mut report = TankReport::default();
        let tuning = ctx.tuning;

        self.steer(ctx);

        if ctx.in_progress {
            if self.fire_mode == FireMode::Normal && self.special_due(ctx.now_ms) {
                let roll = select_mode(rng.random::<f64>() * 100.0, ctx.level, tuning);
                if roll.mode != FireMode::Normal {
                    log::debug!("Tank switches to {} fire", roll.mode.as_str());
                }
                self.fire_mode = roll.mode;
                report.spawn_power_up = roll.spawn_power_up;
                self.last_check_ms = Some(ctx.now_ms);
            }
            self.fire(ctx, rng, &mut report.shots);
        }

        self.body.pos.x = self.body.pos.x.saturating_add(displacement(self.velocity, ctx.dt_ms));
        let right_rail = (ctx.stage_width - self.body.width()).max(0);
        if self.body.pos.x < 0 || self.body.pos.x > right_rail {
            self.body.pos.x = self.body.pos.x.clamp(0, right_rail);
            self.velocity = 0;
        }

        if ctx.now_ms.saturating_sub(self.last_fired_ms) > tuning.recoil_ms {
            self.body.sprite.set_visual(visuals::TURRET_IDLE);
        }
        self.last_velocity = self.velocity;
        report
    }

    fn steer(&mut self, ctx: &TankContext) {
        let tuning = ctx.tuning;
        let center = self.center_x();
        let diff = ctx.target_x - center;

        if ctx.in_progress && diff.abs() > tuning.dead_zone {
            let dir = if diff < 0 { Steer::Left } else { Steer::Right };
            self.velocity = accelerate(self.velocity, dir, &tuning.motion, ctx.dt_ms);
        }

        let was_right = self.ship_is_right;
        if ctx.target_x < center {
            self.ship_is_right = false;
        } else if ctx.target_x > center {
            self.ship_is_right = true;
        }
        let target_crossed = was_right != self.ship_is_right;

        self.velocity = resist(self.velocity, &tuning.motion, ctx.dt_ms);

        if i64::from(self.velocity) * i64::from(self.last_velocity) < 0 {
            self.last_flip_x = self.body.pos.x;
        }
        if target_crossed && (self.body.pos.x - self.last_flip_x).abs() < tuning.flip_distance {
            self.velocity = 0;
        }

        let right_rail = ctx.stage_width - self.body.width();
        if (self.velocity > 0 && self.body.pos.x > right_rail) || (self.velocity < 0 && self.body.pos.x < 0) {
            self.velocity = 0;
        }
    }

    fn fire(&mut self, ctx: &TankContext, rng: &mut impl Rng, shots: &mut Vec<Shot>) {
        let tuning = ctx.tuning;
        match self.fire_mode {
            FireMode::Normal => {
                let spent = self.tracked.iter().all(|id| {
                    ctx.shells
                        .iter()
                        .find(|s| s.id == *id)
                        .is_none_or(|s| s.done)
                });
                if !spent {
                    return;
                }
                self.tracked.clear();
                let (started, wait) = *self.wait.get_or_insert_with(|| {
                    let wait = rng.random::<f64>() * tuning.normal_wait_span_ms + tuning.normal_wait_min_ms;
                    (ctx.now_ms, wait)
                });
                if ctx.now_ms.saturating_sub(started) as f64 > wait {
                    shots.push(self.barrel_shot(0.0, ctx.now_ms, tuning));
                    self.wait = None;
                }
            }
            FireMode::Burst => {
                if self.burst_count < tuning.burst_limit
                    && ctx.now_ms.saturating_sub(self.last_fired_ms) > tuning.burst_interval_ms
                {
                    shots.push(self.barrel_shot(0.0, ctx.now_ms, tuning));
                    self.burst_count += 1;
                } else {
                    self.burst_count = 0;
                    self.fire_mode = FireMode::Normal;
                }
            }
            FireMode::Array => {
                let spread = tuning.array_spread_deg;
                for _ in 0..tuning.array_count {
                    let deg = rng.random::<f32>() * 2.0 * spread - spread;
                    shots.push(self.barrel_shot(deg.to_radians(), ctx.now_ms, tuning));
                }
                self.fire_mode = FireMode::Normal;
            }
        }
    }

    /// Alternate barrels, starting with the left one
    fn barrel_shot(&mut self, angle: f32, now_ms: u64, tuning: &TankTuning) -> Shot {
        let offset = if self.right_last_fired {
            self.right_last_fired = false;
            self.body.sprite.set_visual(visuals::TURRET_LEFT);
            tuning.left_barrel
        } else {
            self.right_last_fired = true;
            self.body.sprite.set_visual(visuals::TURRET_RIGHT);
            tuning.right_barrel
        };
        self.last_fired_ms = now_ms;
        Shot {
            x: self.body.pos.x + offset,
            y: self.body.pos.y,
            angle,
        }
    }
}
