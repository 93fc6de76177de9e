//! Horizontal movement integrator shared by the invader and the tank
//!
//! Everything runs in integer pixels and px/s with truncating division, so a
//! very short tick can produce no movement at all. Products are widened to
//! `i64` so a stalled frame with a huge delta cannot overflow.

use serde::{Deserialize, Serialize};

/// Acceleration, resistance and speed cap for one mover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motion {
    /// Speed gained per second while input is held (px/s²)
    pub acceleration: i32,
    /// Speed lost per second at all times (px/s²)
    pub resistance: i32,
    /// Absolute speed cap (px/s)
    pub max_speed: i32,
}

impl Motion {
    pub const fn new(acceleration: i32, resistance: i32, max_speed: i32) -> Self {
        Self {
            acceleration,
            resistance,
            max_speed,
        }
    }
}

/// Direction of a directed acceleration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

impl Steer {
    #[inline]
    fn sign(self) -> i64 {
        match self {
            Steer::Left => -1,
            Steer::Right => 1,
        }
    }
}

#[inline]
fn scaled(rate: i64, dt_ms: u64) -> i64 {
    // dt is clamped so rate * dt stays inside i64 for any realistic rate
    let dt = dt_ms.min(i64::MAX as u64 / 1_000_000) as i64;
    rate.saturating_mul(dt) / 1000
}

/// Apply one acceleration step and clamp to the speed cap
pub fn accelerate(velocity: i32, steer: Steer, motion: &Motion, dt_ms: u64) -> i32 {
    let max = i64::from(motion.max_speed.max(0));
    let step = scaled(i64::from(motion.acceleration), dt_ms);
    let v = i64::from(velocity).saturating_add(steer.sign() * step);
    v.clamp(-max, max) as i32
}

/// Move velocity toward zero by the resistance step without crossing zero
pub fn resist(velocity: i32, motion: &Motion, dt_ms: u64) -> i32 {
    let step = scaled(i64::from(motion.resistance.max(0)), dt_ms);
    let v = i64::from(velocity);
    if v > 0 {
        (v - step).max(0) as i32
    } else if v < 0 {
        (v + step).min(0) as i32
    } else {
        0
    }
}

/// Displacement in pixels for `velocity` over `dt_ms`
pub fn displacement(velocity: i32, dt_ms: u64) -> i32 {
    scaled(i64::from(velocity), dt_ms).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
