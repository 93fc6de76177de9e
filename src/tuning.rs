//! Data-driven game balance
//!
//! Every gameplay constant lives here. `Tuning::default()` reproduces the
//! stock game; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::sim::physics::Motion;

/// Stage geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTuning {
    /// Stage width in pixels
    pub width: i32,
    /// Stage height in pixels
    pub height: i32,
    /// The invader lands once its lower edge passes `height - landing_margin`
    pub landing_margin: i32,
    /// Vertical position of the tank rail
    pub tank_y: i32,
    /// Land decoration offset (x, and y measured up from the stage bottom)
    pub land_x: i32,
    pub land_rise: i32,
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            width: 384,
            height: 600,
            landing_margin: 75,
            tank_y: 450,
            land_x: -230,
            land_rise: 150,
        }
    }
}

/// Player invader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvaderTuning {
    /// Normal movement tuple
    pub motion: Motion,
    /// Movement tuple while the speed boost is held
    pub boost_motion: Motion,
    /// Pixels dropped on a legitimate side hit
    pub drop_distance: i32,
    /// Score for a legitimate side hit
    pub drop_score: i64,
    /// Descent speed after landing (px/s)
    pub exit_speed: i32,
    /// Speed boost drains this much energy (percent) ...
    pub boost_drain_percent: f64,
    /// ... per this many milliseconds of held input
    pub boost_drain_period_ms: f64,
}

impl Default for InvaderTuning {
    fn default() -> Self {
        Self {
            motion: Motion::new(1000, 300, 300),
            boost_motion: Motion::new(1400, 300, 500),
            drop_distance: 15,
            drop_score: 50,
            exit_speed: 500,
            boost_drain_percent: 100.0,
            boost_drain_period_ms: 5000.0,
        }
    }
}

/// Computer-controlled tank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    pub motion: Motion,
    /// No steering while the invader is within this many pixels horizontally
    pub dead_zone: i32,
    /// Distance the tank must travel after a flip before it may flip again
    pub flip_distance: i32,
    /// Special-attack check interval is `special_delay_base - level * special_delay_per_level`
    pub special_delay_base: i64,
    pub special_delay_per_level: i64,
    /// Burst probability is `burst_base + level / 2`, capped at `burst_cap`
    pub burst_base: f64,
    pub burst_cap: f64,
    /// Array probability is `array_base + level / 2`; above `array_threshold`
    /// it is replaced with `array_cap`
    pub array_base: f64,
    pub array_threshold: f64,
    pub array_cap: f64,
    /// A check draw above this value also drops a power-up
    pub power_up_roll: f64,
    /// Normal fire waits a random time in `[wait_min, wait_min + wait_span)` ms
    pub normal_wait_min_ms: f64,
    pub normal_wait_span_ms: f64,
    /// Minimum spacing between burst shots
    pub burst_interval_ms: u64,
    /// Shells per burst
    pub burst_limit: u32,
    /// Shells per array volley
    pub array_count: u32,
    /// Array shells deviate uniformly up to this many degrees from vertical
    pub array_spread_deg: f32,
    /// Horizontal barrel offsets from the tank's left edge
    pub left_barrel: i32,
    pub right_barrel: i32,
    /// How long the firing-barrel visual stays up
    pub recoil_ms: u64,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            motion: Motion::new(1200, 400, 300),
            dead_zone: 10,
            flip_distance: 100,
            special_delay_base: 5000,
            special_delay_per_level: 50,
            burst_base: 3.0,
            burst_cap: 50.0,
            array_base: 2.0,
            array_threshold: 40.0,
            array_cap: 50.0,
            power_up_roll: 90.0,
            normal_wait_min_ms: 200.0,
            normal_wait_span_ms: 1000.0,
            burst_interval_ms: 10,
            burst_limit: 5,
            array_count: 3,
            array_spread_deg: 45.0,
            left_barrel: 6,
            right_barrel: 19,
            recoil_ms: 70,
        }
    }
}

/// Projectiles and pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Shell speed along its heading (px/s)
    pub shell_speed: i32,
    /// Score lost on an unshielded hit
    pub hit_penalty: i64,
    /// Power-up fall speed (px/s)
    pub power_up_speed: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            shell_speed: 400,
            hit_penalty: 100,
            power_up_speed: 200,
        }
    }
}

/// Pulse shield
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    /// One segment of energy (percent) ...
    pub segment_percent: f64,
    /// ... lasts this long while engaged
    pub segment_ms: f64,
    /// Overlay offset from the invader position
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            segment_percent: 20.0,
            segment_ms: 3000.0,
            offset_x: -55,
            offset_y: 5,
        }
    }
}

/// Score feedback and splash timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackTuning {
    /// Score colour flash duration
    pub flash_ms: u64,
    /// Wall-clock duration of the perfect splash
    pub perfect_ms: u64,
    /// Pop text rise speed (px/s)
    pub pop_speed: i32,
    /// Pop text disappears after rising this far
    pub pop_distance: i32,
}

impl Default for FeedbackTuning {
    fn default() -> Self {
        Self {
            flash_ms: 300,
            perfect_ms: 2000,
            pop_speed: 200,
            pop_distance: 100,
        }
    }
}

/// Full game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub stage: StageTuning,
    pub invader: InvaderTuning,
    pub tank: TankTuning,
    pub projectiles: ProjectileTuning,
    pub shield: ShieldTuning,
    pub feedback: FeedbackTuning,
}

impl Tuning {
    /// Parse a tuning file; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
