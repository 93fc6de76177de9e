//! Visual identifiers and the dimension lookup the simulation depends on
//!
//! The simulation never decodes images. It only needs the pixel size of each
//! visual to build hitboxes, and asks an [`AssetProvider`] for it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Visual identifiers used by the simulation
pub mod visuals {
    pub const BACKGROUND: &str = "bg";
    pub const LAND: &str = "land";
    pub const ALIEN_NORMAL: &str = "alien_normal";
    pub const ALIEN_LEFT: &str = "alien_left";
    pub const ALIEN_RIGHT: &str = "alien_right";
    pub const TURRET_IDLE: &str = "turret_idle";
    pub const TURRET_LEFT: &str = "turret_left";
    pub const TURRET_RIGHT: &str = "turret_right";
    pub const SHELL: &str = "turret_shell";
    pub const SPEED_BOOST: &str = "speed_boost";
    pub const PULSE_SHIELD: &str = "pulse_shield";
    pub const SHIELD: &str = "shield";
    pub const SPEED_BAR_GRID: &str = "speed_bar";
    pub const SHIELD_BAR_GRID: &str = "shield_bar_grid";
    pub const ENERGY_FILL: &str = "shield_bar";
    pub const SPLASH_START: &str = "start";
    pub const SPLASH_NEXT_LEVEL: &str = "next";
    pub const SPLASH_PERFECT: &str = "perfect";
}

/// Width and height of a visual in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Failure to resolve a visual
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotFound(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(visual) => write!(f, "visual not found: {visual}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Resolves a visual identifier to its pixel dimensions
pub trait AssetProvider {
    fn dimensions(&self, visual: &str) -> Result<Size, AssetError>;
}

/// In-memory dimension table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atlas {
    sizes: HashMap<String, Size>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions of the stock sprite sheet
    pub fn with_defaults() -> Self {
        use visuals::*;
        let mut atlas = Self::new();
        for (visual, size) in [
            (BACKGROUND, Size::new(384, 600)),
            (LAND, Size::new(844, 150)),
            (ALIEN_NORMAL, Size::new(32, 24)),
            (ALIEN_LEFT, Size::new(32, 24)),
            (ALIEN_RIGHT, Size::new(32, 24)),
            (TURRET_IDLE, Size::new(26, 20)),
            (TURRET_LEFT, Size::new(26, 20)),
            (TURRET_RIGHT, Size::new(26, 20)),
            (SHELL, Size::new(4, 10)),
            (SPEED_BOOST, Size::new(40, 20)),
            (PULSE_SHIELD, Size::new(21, 24)),
            (SHIELD, Size::new(142, 40)),
            (SPEED_BAR_GRID, Size::new(14, 100)),
            (SHIELD_BAR_GRID, Size::new(14, 100)),
            (ENERGY_FILL, Size::new(14, 100)),
            (SPLASH_START, Size::new(384, 600)),
            (SPLASH_NEXT_LEVEL, Size::new(384, 600)),
            (SPLASH_PERFECT, Size::new(384, 600)),
        ] {
            atlas.insert(visual, size);
        }
        atlas
    }

    pub fn insert(&mut self, visual: impl Into<String>, size: Size) {
        self.sizes.insert(visual.into(), size);
    }

    pub fn remove(&mut self, visual: &str) -> Option<Size> {
        self.sizes.remove(visual)
    }

    pub fn contains(&self, visual: &str) -> bool {
        self.sizes.contains_key(visual)
    }

    /// Add or replace entries from `other`
    pub fn extend(&mut self, other: Atlas) {
        self.sizes.extend(other.sizes);
    }

    /// Load a `{"visual": {"w": .., "h": ..}}` table
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let sizes = serde_json::from_str(json)?;
        Ok(Self { sizes })
    }
}

impl AssetProvider for Atlas {
    fn dimensions(&self, visual: &str) -> Result<Size, AssetError> {
        self.sizes
            .get(visual)
            .copied()
            .ok_or_else(|| AssetError::NotFound(visual.to_string()))
    }
}
