//! Energy bar and pulse shield
//!
//! A single energy scalar in `[0, 100]` is shared by both power-ups. The
//! speed boost drains it continuously; the shield drains it in 20% segments
//! and is cut off whenever a tick would cross a segment boundary.

use glam::IVec2;

use super::entity::{Body, Sprite};
use crate::assets::visuals;
use crate::tuning::ShieldTuning;

pub const MAX_ENERGY: f64 = 100.0;

/// Where the energy bar is drawn
pub const BAR_POSITION: IVec2 = IVec2::new(350, 100);

/// How the energy bar grid is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    /// Smooth gauge (speed boost)
    Continuous,
    /// Five 20% cells (pulse shield)
    #[default]
    Segmented,
}

impl BarMode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(BarMode::Continuous),
            1 => Some(BarMode::Segmented),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BarMode::Continuous => "continuous",
            BarMode::Segmented => "segmented",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continuous" => Some(BarMode::Continuous),
            "segmented" => Some(BarMode::Segmented),
            _ => None,
        }
    }

    /// Grid visual drawn over the fill
    pub fn grid_visual(&self) -> &'static str {
        match self {
            BarMode::Continuous => visuals::SPEED_BAR_GRID,
            BarMode::Segmented => visuals::SHIELD_BAR_GRID,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnergyBar {
    energy: f64,
    mode: BarMode,
    pub visible: bool,
    pub body: Body,
    pub fill: Sprite,
}

impl Default for EnergyBar {
    fn default() -> Self {
        let mode = BarMode::default();
        Self {
            energy: MAX_ENERGY,
            mode,
            visible: false,
            body: Body::new(BAR_POSITION.x, BAR_POSITION.y, mode.grid_visual()),
            fill: Sprite::new(visuals::ENERGY_FILL),
        }
    }
}

impl EnergyBar {
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn mode(&self) -> BarMode {
        self.mode
    }

    /// Switch grid style; this also refills the bar
    pub fn set_mode(&mut self, mode: BarMode) {
        self.mode = mode;
        self.energy = MAX_ENERGY;
        self.body.sprite.set_visual(mode.grid_visual());
    }

    /// Like [`set_mode`](Self::set_mode), unknown codes are ignored
    pub fn set_mode_code(&mut self, code: u8) {
        if let Some(mode) = BarMode::from_code(code) {
            self.set_mode(mode);
        }
    }

    /// Values outside `[0, 100]` are ignored
    pub fn set_energy(&mut self, energy: f64) {
        if (0.0..=MAX_ENERGY).contains(&energy) {
            self.energy = energy;
        }
    }

    pub fn decrease(&mut self, amount: f64) {
        self.energy = (self.energy - amount).max(0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.energy <= 0.0
    }

    /// Fraction of the bar that is filled
    pub fn fill_fraction(&self) -> f32 {
        (self.energy / MAX_ENERGY) as f32
    }
}

/// Overlay drawn around the invader while the shield is up
#[derive(Debug, Clone)]
pub struct Shield {
    pub body: Body,
}

impl Default for Shield {
    fn default() -> Self {
        Self {
            body: Body::new(0, 0, visuals::SHIELD),
        }
    }
}

impl Shield {
    pub fn follow(&mut self, invader_pos: IVec2, tuning: &ShieldTuning) {
        self.body.pos = invader_pos + IVec2::new(tuning.offset_x, tuning.offset_y);
    }
}

/// Resolve shield drain for one tick.
///
/// If this tick's drain would cross a multiple of 20 the energy stops on that
/// multiple and the shield drops instead; at most one boundary is handled per
/// tick. Must run before shells look at `engaged`.
pub fn drain_shield(bar: &mut EnergyBar, engaged: &mut bool, dt_ms: u64, tuning: &ShieldTuning) {
    let amount = tuning.segment_percent * dt_ms as f64 / tuning.segment_ms;
    let segment = tuning.segment_percent.max(f64::EPSILON);

    let mut threshold = MAX_ENERGY - segment;
    while threshold >= 0.0 {
        if bar.energy > threshold && bar.energy - amount < threshold {
            bar.set_energy(threshold);
            *engaged = false;
            break;
        }
        threshold -= segment;
    }

    if *engaged {
        bar.decrease(amount);
    }

    if bar.is_empty() {
        bar.visible = false;
        *engaged = false;
    } else if *engaged {
        bar.visible = true;
    }
}
