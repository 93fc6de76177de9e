//! Shared entity representation
//!
//! Every simulated object carries a [`Body`]: an integer position plus the
//! visual it is currently shown with. Hitboxes are derived from the visual's
//! size, which comes from an [`AssetProvider`] rather than from image data.

use glam::IVec2;

use super::collision::Rect;
use super::physics::displacement;
use crate::assets::{AssetError, AssetProvider, Size};

/// Which kind of object a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Invader,
    Tank,
    Shell,
    PowerUp,
    Decor,
    EnergyBar,
    Shield,
    ScoreText,
    Pop,
}

/// The visual an entity is drawn with, and that visual's last known size
#[derive(Debug, Clone)]
pub struct Sprite {
    pub visual: &'static str,
    pub size: Size,
    /// Visual that `size` was resolved from
    resolved: Option<&'static str>,
    /// Visual that failed to resolve, so it is reported once
    missing: Option<&'static str>,
}

impl Sprite {
    pub fn new(visual: &'static str) -> Self {
        Self {
            visual,
            size: Size::default(),
            resolved: None,
            missing: None,
        }
    }

    /// Sprite with a size that is already known
    pub fn sized(visual: &'static str, size: Size) -> Self {
        Self {
            visual,
            size,
            resolved: Some(visual),
            missing: None,
        }
    }

    pub fn set_visual(&mut self, visual: &'static str) {
        self.visual = visual;
    }

    /// Refresh `size` for the current visual.
    ///
    /// On failure the previous size is kept (zero if never resolved) and the
    /// error is returned once per visual change.
    pub fn resolve(&mut self, assets: &dyn AssetProvider) -> Result<(), AssetError> {
        if self.resolved == Some(self.visual) || self.missing == Some(self.visual) {
            return Ok(());
        }
        match assets.dimensions(self.visual) {
            Ok(size) => {
                self.size = size;
                self.resolved = Some(self.visual);
                self.missing = None;
                Ok(())
            }
            Err(err) => {
                self.missing = Some(self.visual);
                Err(err)
            }
        }
    }
}

/// Position plus visual
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: IVec2,
    pub sprite: Sprite,
}

impl Body {
    pub fn new(x: i32, y: i32, visual: &'static str) -> Self {
        Self {
            pos: IVec2::new(x, y),
            sprite: Sprite::new(visual),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.sprite.size.w
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.sprite.size.h
    }

    /// Full visual rectangle at the current position
    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, self.width(), self.height())
    }
}

/// Static scenery (the land strip)
#[derive(Debug, Clone)]
pub struct Decor {
    pub body: Body,
}

/// Text colours used by score feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    White,
    Green,
    Red,
}

/// Floating score text that rises and then removes itself
#[derive(Debug, Clone)]
pub struct Pop {
    pub text: String,
    pub color: TextColor,
    pub pos: IVec2,
    start_y: i32,
    pub removed: bool,
}

impl Pop {
    pub fn new(text: impl Into<String>, color: TextColor, pos: IVec2) -> Self {
        Self {
            text: text.into(),
            color,
            pos,
            start_y: pos.y,
            removed: false,
        }
    }

    /// Distance risen since creation
    pub fn travelled(&self) -> i32 {
        self.start_y.saturating_sub(self.pos.y)
    }

    pub fn update(&mut self, dt_ms: u64, speed: i32, distance: i32) {
        self.pos.y = self.pos.y.saturating_sub(displacement(speed, dt_ms));
        if self.travelled() > distance {
            self.removed = true;
        }
    }
}
